pub mod backends;
pub mod sensors;
pub mod storage;
pub mod textures;
