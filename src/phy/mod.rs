//! PHY Register Tables
//!
//! Static [`RegisterDef`](crate::register::RegisterDef) tables for specific
//! PHY chips, ready to be loaded into a register map.
//!
//! # Supported PHY Chips
//!
//! - [`marvell`]: Marvell 88E1111 (copper and fiber pages)
//!
//! # Example
//!
//! ```ignore
//! use bitbang_mdio::phy::marvell;
//! use bitbang_mdio::{MdioClient, MdioConfig};
//!
//! let map = marvell::register_map()?;
//! let config = MdioConfig::new().with_page_select(marvell::PAGE_ADDRESS);
//! let mut client = MdioClient::new(&map, engine, config);
//!
//! let status = client.read_register_by_name(0, "PHY_SPECIFIC_STATUS_COPPER")?;
//! let speed = status.get("speed")?;
//! ```

pub mod marvell;
