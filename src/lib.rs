// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod numerical;
pub mod service;
pub mod symbolic;

pub use numerical::newton_cotes::{QuadratureError, QuadratureResult};
pub use numerical::newton_cotes_rules::NewtonCotesRule;
pub use symbolic::evaluator::{EvalError, InputFormat, evaluate};
