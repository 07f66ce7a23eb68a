//! Declarative register/bitfield model
//!
//! Registers are declared once, either with explicit calls on a
//! [`RegisterMapBuilder`] or as `const` [`RegisterDef`] tables, and frozen
//! into a [`RegisterMap`] shared by every client.
//!
//! # Example
//!
//! ```ignore
//! use bitbang_mdio::register::{RegAddr, SmallRegisterMapBuilder};
//!
//! let mut builder = SmallRegisterMapBuilder::new();
//! let status = builder.define_register("STATUS", RegAddr::base(0x11))?;
//! builder.define_field(status, "speed", 14, 2)?;
//! builder.define_field(status, "speed_msb", 15, 1)?;
//! let map = builder.build();
//!
//! let view = map.unpack(status, 0x8000)?;
//! assert_eq!(view.get("speed")?, 0b10);
//! assert_eq!(view.get("speed_msb")?, 1);
//! ```

pub mod field;
pub mod map;
pub mod view;

pub use field::{FieldDef, RegAddr, RegisterDef};
pub use map::{
    DefaultRegisterMap, DefaultRegisterMapBuilder, RegisterHandle, RegisterMap,
    RegisterMapBuilder, SmallRegisterMap, SmallRegisterMapBuilder,
};
pub use view::FieldView;
