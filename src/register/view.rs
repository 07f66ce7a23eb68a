//! Structured, read-only view of a register word

use crate::error::FieldResult;

use super::field::{RegAddr, RegisterDef};

/// A register word interpreted through its definition
///
/// Every field name, aliases included, resolves against the single stored
/// word, so two aliases over the same bits can never disagree. Updates go
/// through [`with`](Self::with), which returns a new view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldView<'a> {
    def: RegisterDef<'a>,
    word: u16,
}

impl<'a> FieldView<'a> {
    pub(crate) const fn new(def: RegisterDef<'a>, word: u16) -> Self {
        Self { def, word }
    }

    /// Packed register value
    pub const fn word(&self) -> u16 {
        self.word
    }

    /// Register definition this view decodes against
    pub const fn definition(&self) -> RegisterDef<'a> {
        self.def
    }

    /// Register name
    pub const fn register_name(&self) -> &'static str {
        self.def.name()
    }

    /// Register address
    pub const fn address(&self) -> RegAddr {
        self.def.address()
    }

    /// Value of the named field
    pub fn get(&self, name: &str) -> FieldResult<u16> {
        Ok(self.def.field(name)?.extract(self.word))
    }

    /// Whether the named field is non-zero
    pub fn is_set(&self, name: &str) -> FieldResult<bool> {
        Ok(self.get(name)? != 0)
    }

    /// All fields in declaration order as `(name, value)`
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, u16)> + use<'a> {
        let word = self.word;
        self.def
            .fields()
            .iter()
            .map(move |f| (f.name(), f.extract(word)))
    }

    /// Copy of this view with one field replaced
    pub fn with(&self, name: &str, value: u16) -> FieldResult<Self> {
        self.with_fields(&[(name, value)])
    }

    /// Copy of this view with several fields replaced, in order
    pub fn with_fields(&self, values: &[(&str, u16)]) -> FieldResult<Self> {
        let word = self.def.pack(self.word, values)?;
        Ok(Self::new(self.def, word))
    }
}

impl core::fmt::Display for FieldView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} @ {} = 0x{:04x} {{",
            self.def.name(),
            self.def.address(),
            self.word
        )?;
        for (i, (name, value)) in self.fields().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        f.write_str(" }")
    }
}
