//! Marvell 88E1111 Register Table
//!
//! Copper/fiber gigabit PHY commonly found on FPGA development boards.
//! Registers 0-15 follow IEEE 802.3 Clause 22; 16-31 are vendor-specific.
//! Page 1 (fiber) registers are reached through the Extended Address
//! register ([`PAGE_ADDRESS`]) and live in the extended bank here.
//!
//! Several fields carry aliases: `speed` in PHY_SPECIFIC_STATUS_COPPER is
//! also readable bit-by-bit as `speed_sel1`/`speed_sel0`, and the control
//! registers expose the reset bit as both `reset` and `soft_reset`.
//!
//! # References
//!
//! - Marvell 88E1111 Datasheet (MV-S100649-00)

use crate::error::ConfigResult;
use crate::register::{FieldDef, RegAddr, RegisterDef, SmallRegisterMap, SmallRegisterMapBuilder};

/// Extended Address (page select) register index
pub const PAGE_ADDRESS: u8 = 22;

/// `hw_config` value selecting GMII to copper
pub const HWCFG_GMII_COPPER: u16 = 0b1111;

// =============================================================================
// Base Bank
// =============================================================================

/// Copper Control Register (0)
pub const CONTROL_COPPER: RegisterDef<'static> = RegisterDef::new(
    "CONTROL_COPPER",
    RegAddr::base(0x00),
    &[
        FieldDef::bit("reset", 15),
        FieldDef::bit("soft_reset", 15),
        FieldDef::bit("loopback", 14),
        FieldDef::bit("speed_sel0", 13),
        FieldDef::bit("autoneg_en", 12),
        FieldDef::bit("power_down", 11),
        FieldDef::bit("isolate", 10),
        FieldDef::bit("restart_copper_autoneg", 9),
        FieldDef::bit("copper_duplex_mode", 8),
        FieldDef::bit("col_test", 7),
        FieldDef::bit("speed_sel1", 6),
    ],
);

/// Copper Status Register (1)
pub const STATUS_COPPER: RegisterDef<'static> = RegisterDef::new(
    "STATUS_COPPER",
    RegAddr::base(0x01),
    &[
        FieldDef::bit("b100base_t4", 15),
        FieldDef::bit("b100_x_fd", 14),
        FieldDef::bit("b100_x_hd", 13),
        FieldDef::bit("b10_fd", 12),
        FieldDef::bit("b10_hd", 11),
        FieldDef::bit("b100_t2_fd", 10),
        FieldDef::bit("b100_t2_hd", 9),
        FieldDef::bit("extended_status", 8),
        FieldDef::bit("mf_preamble_suppression", 6),
        FieldDef::bit("copper_autoneg_done", 5),
        FieldDef::bit("copper_remote_fault", 4),
        FieldDef::bit("autoneg_ability", 3),
        FieldDef::bit("copper_link_status", 2),
        FieldDef::bit("jabber_detect", 1),
        FieldDef::bit("extended_capability", 0),
    ],
);

/// PHY Specific Status Register - Copper (17)
pub const PHY_SPECIFIC_STATUS_COPPER: RegisterDef<'static> = RegisterDef::new(
    "PHY_SPECIFIC_STATUS_COPPER",
    RegAddr::base(0x11),
    &[
        FieldDef::new("speed", 14, 2),
        FieldDef::bit("speed_sel1", 15),
        FieldDef::bit("speed_sel0", 14),
        FieldDef::bit("duplex", 13),
        FieldDef::bit("page_rxed", 12),
        FieldDef::bit("speed_and_duplex_resolved", 11),
        FieldDef::bit("link_real_time", 10),
        FieldDef::new("cable_length_gige", 7, 3),
        FieldDef::bit("mdi_crossover", 6),
        FieldDef::bit("downshift", 5),
        FieldDef::bit("copper_energy_detect", 4),
        FieldDef::bit("tx_pause_en", 3),
        FieldDef::bit("rx_pause_en", 2),
        FieldDef::bit("polarity_real_time", 1),
        FieldDef::bit("jabber_real_time", 0),
    ],
);

/// Extended PHY Specific Control Register (20)
pub const EXT_PHY_SPECIFIC_CTRL: RegisterDef<'static> = RegisterDef::new(
    "EXT_PHY_SPECIFIC_CTRL",
    RegAddr::base(0x14),
    &[
        FieldDef::bit("block_carrier_ext", 15),
        FieldDef::bit("line_loopback", 14),
        FieldDef::bit("disable_link_pulses", 12),
        FieldDef::new("downshift_counter", 9, 3),
        FieldDef::bit("downshift_en", 8),
        FieldDef::bit("rgmii_rx_timing_ctrl", 7),
        FieldDef::new("default_mac_speed", 4, 3),
        FieldDef::bit("dte_detect_en", 2),
        FieldDef::bit("rgmii_tx_timing_ctrl", 1),
    ],
);

/// Receive Error Counter (21)
pub const RX_ERROR_COUNTER: RegisterDef<'static> = RegisterDef::new(
    "RX_ERROR_COUNTER",
    RegAddr::base(0x15),
    &[FieldDef::new("rx_err_cnt", 0, 16)],
);

/// Extended Address / page select (22)
pub const EXT_ADDRESS: RegisterDef<'static> = RegisterDef::new(
    "EXT_ADDRESS",
    RegAddr::base(PAGE_ADDRESS),
    &[FieldDef::new("page", 0, 8)],
);

/// Global Status (23)
pub const GLOBAL_STATUS: RegisterDef<'static> = RegisterDef::new(
    "GLOBAL_STATUS",
    RegAddr::base(0x17),
    &[FieldDef::bit("port_irq", 0)],
);

/// Extended PHY Specific Status Register (27)
pub const EXT_PHY_SPECIFIC_STATUS: RegisterDef<'static> = RegisterDef::new(
    "EXT_PHY_SPECIFIC_STATUS",
    RegAddr::base(0x1B),
    &[
        FieldDef::bit("fiber_copper_autosel_dis", 15),
        FieldDef::bit("fiber_copper_resolution", 13),
        FieldDef::bit("serial_if_autoneg_bypass_en", 12),
        FieldDef::bit("serial_if_autoneg_bypass_status", 11),
        FieldDef::bit("irq_polarity", 10),
        FieldDef::bit("dis_en_auto_medium_reg_sel", 9),
        FieldDef::new("dte_det_status_drop_hys", 5, 4),
        FieldDef::bit("dte_pwr_status", 4),
        FieldDef::new("hw_config", 0, 4),
    ],
);

// =============================================================================
// Extended Bank (page 1, fiber)
// =============================================================================

/// Fiber Control Register (page 1, register 0)
pub const CONTROL_FIBER: RegisterDef<'static> = RegisterDef::new(
    "CONTROL_FIBER",
    RegAddr::extended(0x00),
    &[
        FieldDef::bit("reset", 15),
        FieldDef::bit("soft_reset", 15),
        FieldDef::bit("loopback", 14),
        FieldDef::bit("speed_sel0", 13),
        FieldDef::bit("autoneg_en", 12),
        FieldDef::bit("power_down", 11),
        FieldDef::bit("isolate", 10),
        FieldDef::bit("restart_fiber_autoneg", 9),
        FieldDef::bit("fiber_duplex_mode", 8),
        FieldDef::bit("speed_sel1", 6),
    ],
);

/// Fiber Status Register (page 1, register 1)
pub const STATUS_FIBER: RegisterDef<'static> = RegisterDef::new(
    "STATUS_FIBER",
    RegAddr::extended(0x01),
    &[
        FieldDef::bit("extended_status", 8),
        FieldDef::bit("mf_preamble_suppression", 6),
        FieldDef::bit("fiber_autoneg_done", 5),
        FieldDef::bit("fiber_remote_fault", 4),
        FieldDef::bit("autoneg_ability", 3),
        FieldDef::bit("fiber_link_status", 2),
        FieldDef::bit("extended_capability", 0),
    ],
);

/// Every register of the table, base bank first
pub const REGISTERS: &[RegisterDef<'static>] = &[
    CONTROL_COPPER,
    STATUS_COPPER,
    PHY_SPECIFIC_STATUS_COPPER,
    EXT_PHY_SPECIFIC_CTRL,
    RX_ERROR_COUNTER,
    EXT_ADDRESS,
    GLOBAL_STATUS,
    EXT_PHY_SPECIFIC_STATUS,
    CONTROL_FIBER,
    STATUS_FIBER,
];

/// Build the frozen 88E1111 register map
pub fn register_map() -> ConfigResult<SmallRegisterMap> {
    let mut builder = SmallRegisterMapBuilder::new();
    builder.define_table(REGISTERS)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_valid() {
        for def in REGISTERS {
            assert_eq!(def.validate(), Ok(()), "{}", def.name());
        }
    }

    #[test]
    fn map_builds_with_every_register() {
        let map = register_map().unwrap();
        assert_eq!(map.len(), REGISTERS.len());

        for def in REGISTERS {
            let handle = map.register(def.address()).unwrap();
            assert_eq!(map.definition(handle).unwrap(), *def);
        }
    }

    #[test]
    fn fiber_page_does_not_shadow_copper() {
        let map = register_map().unwrap();
        let copper = map.register(RegAddr::base(0)).unwrap();
        let fiber = map.register(RegAddr::extended(0)).unwrap();

        assert_ne!(copper, fiber);
        assert_eq!(map.definition(copper).unwrap().name(), "CONTROL_COPPER");
        assert_eq!(map.definition(fiber).unwrap().name(), "CONTROL_FIBER");
    }

    #[test]
    fn speed_aliases_agree() {
        for word in [0x0000, 0x4000, 0x8000, 0xC000, 0xFFFF] {
            let view = PHY_SPECIFIC_STATUS_COPPER.unpack(word).unwrap();
            let speed = view.get("speed").unwrap();
            let sel1 = view.get("speed_sel1").unwrap();
            let sel0 = view.get("speed_sel0").unwrap();
            assert_eq!(speed, (sel1 << 1) | sel0);
        }
    }

    #[test]
    fn identical_aliases_report_identical_values() {
        for def in REGISTERS {
            let fields = def.fields();
            for (i, a) in fields.iter().enumerate() {
                for b in fields[i + 1..].iter().filter(|b| a.aliases(b)) {
                    for word in [0x0000, 0xFFFF, 0xA5A5, 0x5A5A] {
                        let view = def.unpack(word).unwrap();
                        assert_eq!(view.get(a.name()), view.get(b.name()));
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_every_field() {
        for def in REGISTERS {
            for field in def.fields() {
                for value in 0..=field.value_mask() {
                    let word = def.pack(0, &[(field.name(), value)]).unwrap();
                    assert_eq!(def.unpack(word).unwrap().get(field.name()), Ok(value));
                }
            }
        }
    }

    #[test]
    fn hw_config_reconfigure_word() {
        let view = EXT_PHY_SPECIFIC_STATUS.unpack(0x8484).unwrap();
        let updated = view.with("hw_config", HWCFG_GMII_COPPER).unwrap();

        assert_eq!(updated.word(), 0x848F);
        assert_eq!(updated.get("irq_polarity"), Ok(1));
        assert_eq!(updated.get("fiber_copper_autosel_dis"), Ok(1));
    }
}
