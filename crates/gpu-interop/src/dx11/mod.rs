//! D3D11 driver implementation (Windows).

pub mod driver;

pub use driver::D3d11Driver;
