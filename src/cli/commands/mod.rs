pub mod build_info;
pub mod decode;
pub mod token;
