use RustedNewtonCotes::Utils::config::QuadConfig;
use RustedNewtonCotes::service::{handle, methods_catalog};
use RustedNewtonCotes::{InputFormat, NewtonCotesRule, evaluate};
use approx::assert_relative_eq;
use serde_json::Value;
use std::f64::consts::{E, PI};
use strum::IntoEnumIterator;

fn post(route: &str, body: &str) -> Value {
    handle(route, body, &QuadConfig::default())
}

#[test]
fn every_route_integrates_a_line_exactly() {
    for rule in NewtonCotesRule::iter() {
        let response = post(
            &rule.to_string(),
            r#"{"funcion": "3*x + 1", "a": 0, "b": 2, "n": 12}"#,
        );
        assert_relative_eq!(response["resultado"].as_f64().unwrap(), 8.0, epsilon = 1e-13);
        assert_eq!(response["metodo"], rule.display_name());
        assert_eq!(response["formula"], rule.formula());
    }
}

#[test]
fn tables_are_ordered_by_index() {
    for rule in NewtonCotesRule::iter() {
        let response = post(
            &rule.to_string(),
            r#"{"funcion": "\\cos(x)", "formato": "latex", "a": 0, "b": 1, "n": 9}"#,
        );
        let indices: Vec<u64> = response["tabla_iteracion"]
            .as_array()
            .unwrap()
            .iter()
            .map(|node| node["i"].as_u64().unwrap())
            .collect();
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]), "{}", rule);
        let n = response["n"].as_u64().unwrap();
        if rule == NewtonCotesRule::OpenSimpson13 {
            assert_eq!(indices, vec![1, 2, 3]);
        } else {
            assert_eq!(indices, (0..=n).collect::<Vec<_>>());
        }
    }
}

#[test]
fn latex_request_matches_python_request() {
    let latex = post(
        "simpson38",
        r#"{"funcion": "\\frac{1}{1+x^2}", "formato": "latex", "a": 0, "b": 1, "n": 30}"#,
    );
    let python = post(
        "simpson38",
        r#"{"funcion": "1/(1+x**2)", "a": 0, "b": 1, "n": 30}"#,
    );
    assert_relative_eq!(
        latex["resultado"].as_f64().unwrap(),
        python["resultado"].as_f64().unwrap(),
        epsilon = 1e-14
    );
    assert_relative_eq!(latex["resultado"].as_f64().unwrap(), PI / 4.0, epsilon = 1e-8);
}

#[test]
fn error_payloads() {
    let response = post("boole", r#"{"formato": "latex", "a": 0, "b": 1}"#);
    assert!(response["error"].is_string());
    let response = post(
        "boole",
        r#"{"funcion": "\\frac{1}{", "formato": "latex", "a": 0, "b": 1}"#,
    );
    assert!(response["error"].as_str().unwrap().contains("x = 0"));
    assert!(response.get("tabla_iteracion").is_none());
}

#[test]
fn evaluator_entry_point() {
    assert_relative_eq!(
        evaluate("e^{x}", 1.0, InputFormat::MarkupMath).unwrap(),
        E,
        epsilon = 1e-15
    );
    assert_eq!(evaluate("x**2", -3.0, InputFormat::Native), Ok(9.0));
}

#[test]
fn catalog_lists_every_route() {
    let catalog = methods_catalog();
    for rule in NewtonCotesRule::iter() {
        let endpoint = format!("/{}", rule);
        assert!(
            catalog["metodos"]
                .as_array()
                .unwrap()
                .iter()
                .any(|method| method["endpoint"] == endpoint.as_str())
        );
    }
}
