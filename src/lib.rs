pub mod arguments;
pub mod arithmetic;
pub mod calculator;
pub mod decimal;
pub mod error;
pub mod operation;
pub mod response;
pub mod server;


pub use calculator::Calculator;
pub use error::CalcError;
pub use server::CalculatorServer;
