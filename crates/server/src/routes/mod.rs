pub mod bookings;
pub mod enrollments;
pub mod health;
pub mod root;
pub mod sessions;
pub mod students;
