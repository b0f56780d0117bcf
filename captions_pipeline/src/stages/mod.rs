pub mod check;
pub mod fmt;
pub mod image;
pub mod lint;
pub mod security;
pub mod smoke;
