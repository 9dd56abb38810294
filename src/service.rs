//! # Request adapter
//!
//! JSON in, JSON out: decodes an integration request for one of the routes
//! (`trapecio`, `boole`, `simpson38`, `simpson13`, `simpson_abierto`), checks its
//! parameters, runs the rule and encodes either the result or `{"error": message}`.
//!
//! Request body:
//! ```json
//! { "funcion": "x^2 + \\sin(x)", "formato": "latex", "a": 0, "b": 3.14, "n": 100 }
//! ```
//! `formato` defaults to `"python"`, `n` defaults to the configured value of the rule,
//! and `a`, `b`, `n` may also be given as numeric strings.
use crate::Utils::config::QuadConfig;
use crate::numerical::newton_cotes::{MAX_SUBINTERVALS, QuadratureError, QuadratureResult};
use crate::numerical::newton_cotes_rules::NewtonCotesRule;
use crate::symbolic::evaluator::{ExpressionEvaluator, InputFormat};
use log::{error, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no valid JSON data received: {0}")]
    InvalidJson(String),
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("{0}")]
    Input(String),
    #[error("cannot encode the result: {0}")]
    Encode(String),
    #[error(transparent)]
    Quadrature(#[from] QuadratureError),
}

/// A number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Number(value) => Some(*value),
            Numeric::Text(text) => text.trim().parse().ok(),
        }
    }

    /// integer part, the way a float or an integer literal is truncated
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Numeric::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            Numeric::Number(_) => None,
            Numeric::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationRequest {
    #[serde(default)]
    pub funcion: Option<String>,
    #[serde(default)]
    pub formato: Option<String>,
    #[serde(default)]
    pub a: Option<Numeric>,
    #[serde(default)]
    pub b: Option<Numeric>,
    #[serde(default)]
    pub n: Option<Numeric>,
}

/// A request whose parameters passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub funcion: String,
    pub format: InputFormat,
    pub a: f64,
    pub b: f64,
    pub n: usize,
}

impl IntegrationRequest {
    pub fn validate(
        &self,
        rule: NewtonCotesRule,
        config: &QuadConfig,
    ) -> Result<ValidatedRequest, ServiceError> {
        let funcion = match self.funcion.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return Err(ServiceError::Input("the 'funcion' parameter is missing".to_string())),
        };
        let format = match self.formato.as_deref() {
            None => InputFormat::Native,
            Some(name) => InputFormat::from_str(name).map_err(|_| {
                ServiceError::Input(format!(
                    "unsupported format '{}', expected python or latex",
                    name
                ))
            })?,
        };
        let bound = |value: &Option<Numeric>| value.as_ref().and_then(Numeric::as_f64);
        let (Some(a), Some(b)) = (bound(&self.a), bound(&self.b)) else {
            return Err(ServiceError::Input(
                "the 'a' and 'b' parameters must be numbers".to_string(),
            ));
        };
        let n = match &self.n {
            None => config.default_n(rule),
            Some(value) => match value.as_integer() {
                Some(n) if n > MAX_SUBINTERVALS as i64 => {
                    return Err(ServiceError::Input(format!(
                        "the 'n' parameter must not exceed {}",
                        MAX_SUBINTERVALS
                    )));
                }
                Some(n) if n > 0 => n as usize,
                Some(_) => {
                    return Err(ServiceError::Input(
                        "the 'n' parameter must be a positive integer".to_string(),
                    ));
                }
                None => {
                    return Err(ServiceError::Input(
                        "the 'n' parameter must be an integer".to_string(),
                    ));
                }
            },
        };
        Ok(ValidatedRequest {
            funcion,
            format,
            a,
            b,
            n,
        })
    }
}

/// Decodes, checks and runs one request.
pub fn integrate_request(
    route: &str,
    body: &str,
    config: &QuadConfig,
) -> Result<QuadratureResult, ServiceError> {
    let route = route.trim().trim_start_matches('/');
    let rule = NewtonCotesRule::from_str(route)
        .map_err(|_| ServiceError::UnknownMethod(route.to_string()))?;
    let request: IntegrationRequest =
        serde_json::from_str(body).map_err(|e| ServiceError::InvalidJson(e.to_string()))?;
    let params = request.validate(rule, config)?;
    info!(
        "{} request: '{}' ({}) on [{}, {}], n = {}",
        rule, params.funcion, params.format, params.a, params.b, params.n
    );
    let evaluator = ExpressionEvaluator::with_imaginary_tolerance(
        &params.funcion,
        params.format,
        config.imaginary_tolerance,
    )
    .map_err(|e| ServiceError::Input(e.to_string()))?;
    Ok(rule.integrate_with(&evaluator, params.a, params.b, params.n)?)
}

/// Response payload for a request: the encoded result or `{"error": message}`.
pub fn handle(route: &str, body: &str, config: &QuadConfig) -> Value {
    let response = integrate_request(route, body, config).and_then(|result| {
        serde_json::to_value(&result).map_err(|e| ServiceError::Encode(e.to_string()))
    });
    match response {
        Ok(value) => value,
        Err(e) => {
            error!("{} request failed: {}", route, e);
            json!({ "error": e.to_string() })
        }
    }
}

fn catalog_entry(rule: NewtonCotesRule) -> (&'static str, &'static str, &'static str) {
    match rule {
        NewtonCotesRule::Trapezoidal => (
            "Método del Trapecio para integración numérica",
            "I = (h/2)[f(x₀) + 2f(x₁) + 2f(x₂) + ... + 2f(xₙ₋₁) + f(xₙ)]",
            "Incluye detalles de cada punto evaluado con índice, valor de x, f(x), coeficiente aplicado y producto",
        ),
        NewtonCotesRule::Boole => (
            "Método de Jorge Boole para integración numérica",
            "I = (2h/45)[7f(x₀) + 32f(x₁) + 12f(x₂) + 32f(x₃) + 7f(x₄)]",
            "Incluye cada punto evaluado una vez con su coeficiente acumulado (7,32,12,32,14,...); 'segmentos' detalla cada segmento con los coeficientes (7,32,12,32,7)",
        ),
        NewtonCotesRule::Simpson38 => (
            "Método de Simpson 3/8 para integración numérica",
            "I = (3h/8)[f(x₀) + 3f(x₁) + 3f(x₂) + 2f(x₃) + ... + f(xₙ)]",
            "Incluye detalles de cada punto con sus respectivos coeficientes (1,3,3,2,...)",
        ),
        NewtonCotesRule::Simpson13 => (
            "Método de Simpson 1/3 para integración numérica",
            "I = (h/3)[f(x₀) + 4f(x₁) + 2f(x₂) + 4f(x₃) + ... + f(xₙ)]",
            "Incluye detalles de cada punto con sus respectivos coeficientes (1,4,2,4,...)",
        ),
        NewtonCotesRule::OpenSimpson13 => (
            "Método de Simpson Abierto para integración numérica",
            "I = (4h/3)[2f(x₁) - f(x₂) + 2f(x₃)]",
            "Incluye detalles de los puntos internos evaluados (los extremos no se evalúan en este método)",
        ),
    }
}

/// Static description of the available methods, formats and payloads.
pub fn methods_catalog() -> Value {
    let formats: Vec<String> = InputFormat::iter().map(|format| format.to_string()).collect();
    let methods: Vec<Value> = NewtonCotesRule::iter()
        .map(|rule| {
            let (description, formula, table) = catalog_entry(rule);
            json!({
                "nombre": rule.display_name(),
                "endpoint": format!("/{}", rule),
                "descripcion": description,
                "formula": formula,
                "formato_soportado": formats,
                "tabla_iteracion": table,
            })
        })
        .collect();
    json!({
        "metodos": methods,
        "formatos": {
            "python": "Expresiones matemáticas en sintaxis de Python (ej: x**2 + 2*x + 1)",
            "latex": "Expresiones matemáticas en formato LaTeX (ej: x^2 + 2x + 1)"
        },
        "ejemplo_peticion": {
            "funcion": "x^2 + \\sin(x)",
            "formato": "latex",
            "a": 0,
            "b": 3.14,
            "n": 100
        },
        "respuesta_incluye": {
            "resultado": "Valor numérico de la integral",
            "metodo": "Nombre del método utilizado",
            "funcion": "Función evaluada",
            "formato": "Formato de la función (python o latex)",
            "a": "Límite inferior",
            "b": "Límite superior",
            "n": "Número de subintervalos",
            "h": "Tamaño del paso",
            "tabla_iteracion": "Tabla con los detalles de cada punto evaluado durante el cálculo",
            "segmentos": "Solo Jorge Boole: intervalo, valor y puntos de cada segmento",
            "formula": "Fórmula matemática aplicada"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> QuadConfig {
        QuadConfig::default()
    }

    fn error_of(response: &Value) -> String {
        response["error"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn test_trapezoidal_request() {
        let response = handle(
            "trapecio",
            r#"{"funcion": "x", "a": 0, "b": 2, "n": 4}"#,
            &config(),
        );
        assert_eq!(response["resultado"], 2.0);
        assert_eq!(response["metodo"], "Trapecio");
        assert_eq!(response["formato"], "python");
        assert_eq!(response["n"], 4);
        assert_eq!(response["h"], 0.5);
        assert_eq!(response["tabla_iteracion"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_defaults_and_numeric_strings() {
        let response = handle(
            "/trapecio",
            r#"{"funcion": "x**2", "a": "0", "b": " 3 "}"#,
            &config(),
        );
        assert_eq!(response["n"], 10);
        assert_eq!(response["b"], 3.0);
        let response = handle(
            "boole",
            r#"{"funcion": "x^2 + \\sin(x)", "formato": "latex", "a": 0, "b": 3.14}"#,
            &config(),
        );
        assert_eq!(response["n"], 4);
        assert_eq!(response["segmentos"].as_array().unwrap().len(), 1);
        let response = handle(
            "simpson13",
            r#"{"funcion": "x**3", "a": 0, "b": 1, "n": "2"}"#,
            &config(),
        );
        assert_relative_eq!(response["resultado"].as_f64().unwrap(), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_float_n_is_truncated() {
        let params = IntegrationRequest {
            funcion: Some("x".to_string()),
            a: Some(Numeric::Number(0.0)),
            b: Some(Numeric::Number(1.0)),
            n: Some(Numeric::Number(6.9)),
            ..IntegrationRequest::default()
        }
        .validate(NewtonCotesRule::Simpson38, &config())
        .unwrap();
        assert_eq!(params.n, 6);
        assert_eq!(params.format, InputFormat::Native);
    }

    #[test]
    fn test_open_rule_request() {
        let response = handle(
            "simpson_abierto",
            r#"{"funcion": "x**2", "a": 0, "b": 4}"#,
            &config(),
        );
        let table = response["tabla_iteracion"].as_array().unwrap();
        let indices: Vec<u64> = table.iter().map(|node| node["i"].as_u64().unwrap()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(response["h"], 1.0);
        assert_eq!(response["metodo"], "Simpson Abierto 1/3");
    }

    #[test]
    fn test_input_errors() {
        let cases = [
            (r#"{"a": 0, "b": 1}"#, "funcion"),
            (r#"{"funcion": "  ", "a": 0, "b": 1}"#, "funcion"),
            (r#"{"funcion": "x", "a": "zero", "b": 1}"#, "'a' and 'b'"),
            (r#"{"funcion": "x", "b": 1}"#, "'a' and 'b'"),
            (r#"{"funcion": "x", "a": 0, "b": 1, "n": 0}"#, "positive"),
            (r#"{"funcion": "x", "a": 0, "b": 1, "n": -3}"#, "positive"),
            (r#"{"funcion": "x", "a": 0, "b": 1, "n": "many"}"#, "integer"),
            (r#"{"funcion": "x", "formato": "mathml", "a": 0, "b": 1}"#, "mathml"),
        ];
        for (body, fragment) in cases {
            let response = handle("simpson13", body, &config());
            assert!(
                error_of(&response).contains(fragment),
                "{} gave {}",
                body,
                response
            );
        }
    }

    #[test]
    fn test_oversized_n_is_rejected() {
        for body in [
            r#"{"funcion": "x", "a": 0, "b": 1, "n": 1e300}"#,
            r#"{"funcion": "x", "a": 0, "b": 1, "n": 10000001}"#,
            r#"{"funcion": "x", "a": 0, "b": 1, "n": "9223372036854775807"}"#,
        ] {
            let response = handle("trapecio", body, &config());
            assert!(
                error_of(&response).contains("must not exceed"),
                "{} gave {}",
                body,
                response
            );
        }
    }

    #[test]
    fn test_encode_error_message() {
        let err = ServiceError::Encode("NaN".to_string());
        assert_eq!(err.to_string(), "cannot encode the result: NaN");
        assert!(!err.to_string().contains("received"));
    }

    #[test]
    fn test_transport_errors() {
        let response = handle("romberg", r#"{"funcion": "x", "a": 0, "b": 1}"#, &config());
        assert!(error_of(&response).contains("romberg"));
        let response = handle("trapecio", "not json", &config());
        assert!(error_of(&response).contains("JSON"));
        assert!(matches!(
            integrate_request("trapecio", "null", &config()),
            Err(ServiceError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_evaluation_error_payload() {
        let response = handle(
            "trapecio",
            r#"{"funcion": "1/(x - 1)", "a": 0, "b": 2, "n": 2}"#,
            &config(),
        );
        assert!(error_of(&response).contains("x = 1"));
        assert!(response.get("resultado").is_none());
        let response = handle(
            "simpson13",
            r#"{"funcion": "y*x", "a": 0, "b": 1}"#,
            &config(),
        );
        assert!(error_of(&response).contains("name 'y' is not defined"));
    }

    #[test]
    fn test_methods_catalog() {
        let catalog = methods_catalog();
        let methods = catalog["metodos"].as_array().unwrap();
        assert_eq!(methods.len(), 5);
        let endpoints: Vec<&str> = methods
            .iter()
            .map(|method| method["endpoint"].as_str().unwrap())
            .collect();
        assert_eq!(
            endpoints,
            vec!["/trapecio", "/boole", "/simpson38", "/simpson13", "/simpson_abierto"]
        );
        assert_eq!(methods[1]["nombre"], "Jorge Boole");
        assert_eq!(methods[0]["formato_soportado"], json!(["python", "latex"]));
        assert!(catalog["formatos"].get("latex").is_some());
        assert_eq!(catalog["ejemplo_peticion"]["n"], 100);
    }
}
