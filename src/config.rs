use crate::types::Variant;
use crate::ConfigError;

/// Largest record payload permitted by the protocol (2^14).
pub const MAX_FRAGMENT_LEN: usize = 16_384;

/// Record layer configuration
#[derive(Debug, Clone)]
pub struct Config {
    variant: Variant,
    max_fragment_len: usize,
    max_queue_tx: usize,
    max_queue_rx: usize,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            variant: Variant::Stream,
            max_fragment_len: MAX_FRAGMENT_LEN,
            max_queue_tx: 10,
            max_queue_rx: 30,
        }
    }

    /// Stream (TLS) or datagram (DTLS) session.
    #[inline(always)]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Largest record payload accepted on read and produced on write.
    #[inline(always)]
    pub fn max_fragment_len(&self) -> usize {
        self.max_fragment_len
    }

    /// Max amount of framed outgoing records waiting to be flushed.
    #[inline(always)]
    pub fn max_queue_tx(&self) -> usize {
        self.max_queue_tx
    }

    /// Max amount of parsed incoming datagram records to buffer.
    ///
    /// Records beyond this from a single datagram are dropped.
    #[inline(always)]
    pub fn max_queue_rx(&self) -> usize {
        self.max_queue_rx
    }
}

/// Builder for record layer configuration.
#[derive(Debug)]
pub struct ConfigBuilder {
    variant: Variant,
    max_fragment_len: usize,
    max_queue_tx: usize,
    max_queue_rx: usize,
}

impl ConfigBuilder {
    /// Set the record layer variant.
    ///
    /// Defaults to [`Variant::Stream`].
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the largest record payload.
    ///
    /// Defaults to 16384, which is also the maximum.
    pub fn max_fragment_len(mut self, len: usize) -> Self {
        self.max_fragment_len = len;
        self
    }

    /// Set the max amount of outgoing records to queue.
    ///
    /// Defaults to 10.
    pub fn max_queue_tx(mut self, max_queue_tx: usize) -> Self {
        self.max_queue_tx = max_queue_tx;
        self
    }

    /// Set the max amount of incoming datagram records to buffer.
    ///
    /// Defaults to 30.
    pub fn max_queue_rx(mut self, max_queue_rx: usize) -> Self {
        self.max_queue_rx = max_queue_rx;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.max_fragment_len == 0 || self.max_fragment_len > MAX_FRAGMENT_LEN {
            return Err(ConfigError::FragmentLength(self.max_fragment_len));
        }
        if self.max_queue_tx == 0 {
            return Err(ConfigError::EmptyTransmitQueue);
        }
        if self.max_queue_rx == 0 {
            return Err(ConfigError::EmptyReceiveQueue);
        }

        Ok(Config {
            variant: self.variant,
            max_fragment_len: self.max_fragment_len,
            max_queue_tx: self.max_queue_tx,
            max_queue_rx: self.max_queue_rx,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder()
            .build()
            .expect("Default config should always validate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.variant(), Variant::Stream);
        assert_eq!(c.max_fragment_len(), 16_384);
        assert_eq!(c.max_queue_tx(), 10);
        assert_eq!(c.max_queue_rx(), 30);
    }

    #[test]
    fn builder_validates() {
        let c = Config::builder()
            .variant(Variant::Datagram)
            .max_fragment_len(512)
            .build()
            .unwrap();
        assert!(c.variant().is_datagram());
        assert_eq!(c.max_fragment_len(), 512);

        let err = Config::builder().max_fragment_len(20_000).build();
        assert_eq!(err.unwrap_err(), ConfigError::FragmentLength(20_000));

        let err = Config::builder().max_queue_tx(0).build();
        assert_eq!(err.unwrap_err(), ConfigError::EmptyTransmitQueue);

        let err = Config::builder().max_queue_rx(0).build();
        assert_eq!(err.unwrap_err(), ConfigError::EmptyReceiveQueue);
    }
}
