// Network interface models

/// Per-interface traffic since the previous sample.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRate {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    /// Seconds covered by `rx_bytes` / `tx_bytes`.
    pub elapsed_secs: f64,
    /// Declared link speed in bits per second, 0 when unknown.
    pub speed_bits: u64,
}

impl InterfaceRate {
    /// Receive rate in bits per second. Elapsed time is floored at one second.
    pub fn rx_bits_per_sec(&self) -> f64 {
        self.rx_bytes as f64 * 8.0 / self.elapsed_secs.max(1.0)
    }

    pub fn tx_bits_per_sec(&self) -> f64 {
        self.tx_bytes as f64 * 8.0 / self.elapsed_secs.max(1.0)
    }
}
