pub mod answer;
pub mod invocation;
pub mod text;

pub use answer::{fallback_answer, parse_answer, FALLBACK_ANSWER};
pub use invocation::{fallback_invocation, parse_invocation};
