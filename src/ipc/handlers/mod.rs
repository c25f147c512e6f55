pub mod backup;
pub mod core;
pub mod marks;
pub mod program;
pub mod viz;
pub mod wizard;
