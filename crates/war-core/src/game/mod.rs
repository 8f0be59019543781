pub mod event;
pub mod match_state;
pub mod round;
