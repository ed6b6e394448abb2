pub mod category;
pub mod codes;
pub mod days;
pub mod progression;
pub mod schedule;
pub mod states;
pub mod transitions;
