//! # qrlens
//!
//! A Rust library for encoding text into QR symbols and analyzing scanned QR symbols back into
//! structural diagnostics and data, with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **QR Code Generation**: Numeric, alphanumeric and byte modes, versions 1 to 40, all four
//!   error correction levels and automatic mask selection
//! - **QR Code Analysis**: Locates finder patterns in a binary raster, samples the module grid
//!   and reports the health of every function pattern along with the decoded data
//! - **Reed-Solomon Error Correction**: Codewords are corrected per block and every corrected
//!   position is reported
//!
//! ## Quick Start
//!
//! ### Generation
//!
//! ```rust
//! use qrlens::{ECLevel, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!").ec_level(ECLevel::M).build()?;
//!
//! let img = qr.render(4); // 4 pixels per module
//! assert_eq!(img.width() as usize, (qr.width() + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Analysis
//!
//! ```rust
//! use qrlens::{analyze, BinaryGrid, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("123").build()?;
//! let grid = BinaryGrid::from_qr(&qr, 3);
//!
//! let report = analyze(&grid);
//! assert!(report.is_success());
//! assert_eq!(report.data_analysis.extracted_data.as_deref(), Some("123"));
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;
pub mod reader;

pub use builder::{Module, QRBuilder, QR, QUIET_ZONE_WIDTH};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use reader::*;
