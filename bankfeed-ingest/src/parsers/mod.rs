pub mod chase;
