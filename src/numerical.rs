///  Example#1
/// ```
///  // integrate a function given in arithmetic syntax
///  use RustedNewtonCotes::numerical::newton_cotes_rules::NewtonCotesRule;
///  use RustedNewtonCotes::symbolic::evaluator::InputFormat;
///  let res = NewtonCotesRule::Trapezoidal
///      .integrate("x", InputFormat::Native, 0.0, 2.0, 4)
///      .unwrap();
///  assert_eq!(res.result, 2.0);
///  // every evaluated node, ordered by index
///  for node in &res.table {
///      println!("{} {} {} {}", node.i, node.xi, node.fxi, node.coefficient);
///  }
///  ```
/// Example#2
/// ```
///  // the same with LaTeX input; Boole also reports its segments
///  use RustedNewtonCotes::numerical::newton_cotes_rules::NewtonCotesRule;
///  use RustedNewtonCotes::symbolic::evaluator::InputFormat;
///  let res = NewtonCotesRule::Boole
///      .integrate(r"x^2 + \sin(x)", InputFormat::MarkupMath, 0.0, 3.14, 8)
///      .unwrap();
///  println!("{}", res.pretty_table());
///  println!("{:?}", res.pretty_segments());
///  ```
pub mod newton_cotes;
pub mod newton_cotes_rules;
/// text rendering of the iteration table
pub mod iteration_table;
