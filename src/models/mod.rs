pub mod career_advice;
pub mod mentorship;
pub mod role;
pub mod token;
pub mod user;

pub use career_advice::*;
pub use mentorship::*;
pub use role::*;
pub use token::*;
pub use user::*;
