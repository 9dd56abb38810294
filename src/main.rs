#![allow(non_snake_case)]
use RustedNewtonCotes::Utils::config::QuadConfig;
use RustedNewtonCotes::Utils::logger::init_logger;
use RustedNewtonCotes::service::{integrate_request, methods_catalog};
use log::error;
use serde_json::json;
use std::env;
use std::fs;
use std::process::ExitCode;

const USAGE: &str = "usage: RustedNewtonCotes <trapecio|boole|simpson38|simpson13|simpson_abierto> <request.json> [config.toml]\n       RustedNewtonCotes metodos";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [route] if route == "metodos" => {
            println!("{:#}", methods_catalog());
            ExitCode::SUCCESS
        }
        [route, request] => run(route, request, None),
        [route, request, config] => run(route, request, Some(config)),
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

fn run(route: &str, request_path: &str, config_path: Option<&String>) -> ExitCode {
    let config = match config_path {
        Some(path) => match QuadConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => QuadConfig::default(),
    };
    if let Err(e) = init_logger(&config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let body = match fs::read_to_string(request_path) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("cannot read {}: {}", request_path, e);
            return ExitCode::FAILURE;
        }
    };
    match integrate_request(route, &body, &config) {
        Ok(result) => {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("{}", e),
            }
            result.log_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{} request failed: {}", route, e);
            println!("{:#}", json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}
