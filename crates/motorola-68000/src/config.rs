//! Per-instance CPU configuration.

use std::fmt;

/// Identifies one CPU instance in a multi-CPU host.
///
/// Carried in log messages and snapshots so the host can tell cores apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "68000#{}", self.0)
    }
}

/// Configuration of a [`Cpu68000`](crate::Cpu68000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuConfig {
    pub instance: InstanceId,
    /// Mask applied to every data address. The 68000 drives 24 address
    /// lines.
    pub address_mask: u32,
    /// Raise an address error when a branch, jump or return lands on an
    /// odd address.
    pub check_branches: bool,
    /// Take the trace exception after each instruction when T is set.
    pub emulate_trace: bool,
    /// Recognise busy-wait loops and burn the rest of the slice instead of
    /// spinning through them.
    pub idle_loop_skip: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            instance: InstanceId::default(),
            address_mask: 0x00FF_FFFF,
            check_branches: true,
            emulate_trace: true,
            idle_loop_skip: false,
        }
    }
}

impl CpuConfig {
    #[must_use]
    pub fn with_instance(mut self, instance: InstanceId) -> Self {
        self.instance = instance;
        self
    }

    #[must_use]
    pub fn with_address_mask(mut self, mask: u32) -> Self {
        self.address_mask = mask;
        self
    }

    #[must_use]
    pub fn with_check_branches(mut self, enabled: bool) -> Self {
        self.check_branches = enabled;
        self
    }

    #[must_use]
    pub fn with_emulate_trace(mut self, enabled: bool) -> Self {
        self.emulate_trace = enabled;
        self
    }

    #[must_use]
    pub fn with_idle_loop_skip(mut self, enabled: bool) -> Self {
        self.idle_loop_skip = enabled;
        self
    }

    /// Check that the configuration describes a usable CPU.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mask = self.address_mask;
        if mask & mask.wrapping_add(1) != 0 {
            return Err(ConfigError::NonContiguousMask(mask));
        }
        if mask < 0xFFFF {
            return Err(ConfigError::MaskTooNarrow(mask));
        }
        Ok(())
    }
}

/// Reasons a [`CpuConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The address mask is not a run of low one bits.
    NonContiguousMask(u32),
    /// The address mask cannot cover the exception vector table and a
    /// minimal program.
    MaskTooNarrow(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonContiguousMask(mask) => {
                write!(f, "address mask ${mask:08X} is not a contiguous low-bit mask")
            }
            Self::MaskTooNarrow(mask) => {
                write!(f, "address mask ${mask:08X} is narrower than 16 bits")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = CpuConfig::default();
        assert_eq!(config.address_mask, 0x00FF_FFFF);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_32_bit_mask_is_valid() {
        let config = CpuConfig::default().with_address_mask(u32::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_masks() {
        let holes = CpuConfig::default().with_address_mask(0x00FF_00FF);
        assert_eq!(
            holes.validate(),
            Err(ConfigError::NonContiguousMask(0x00FF_00FF))
        );
        let narrow = CpuConfig::default().with_address_mask(0xFF);
        assert_eq!(narrow.validate(), Err(ConfigError::MaskTooNarrow(0xFF)));
    }

    #[test]
    fn instance_display() {
        assert_eq!(InstanceId(2).to_string(), "68000#2");
    }
}
