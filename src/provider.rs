//! Hosting service providers behind an attachment session.
//!
//! A provider module is attached once. At that point it constructs its
//! operation table, which the owning subsystem then uses. The session keeps
//! the generic attachment data and the provider side by side.

/// Kind of service a provider module offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    RecordTransport,
    Cryptography,
    TrustPolicy,
}

/// Parameters a provider module is attached with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub handle: u64,
    /// Major and minor version requested by the caller.
    pub version: (u32, u32),
    pub subservice_id: u32,
    pub service_type: ServiceType,
    pub flags: u32,
}

/// A provider module.
pub trait ServiceProvider {
    /// Operation table handed to the owning subsystem.
    type Ops;

    /// Construct the operation table for an attachment.
    ///
    /// Called exactly once per attachment.
    fn construct(&self, attachment: &Attachment) -> Self::Ops;
}

/// An attached provider together with the operations it constructed.
pub struct ProviderSession<P: ServiceProvider> {
    attachment: Attachment,
    provider: P,
    ops: P::Ops,
}

impl<P: ServiceProvider> ProviderSession<P> {
    pub fn attach(attachment: Attachment, provider: P) -> Self {
        debug!(
            "Attach {:?} provider, handle {} subservice {}",
            attachment.service_type, attachment.handle, attachment.subservice_id
        );
        let ops = provider.construct(&attachment);
        ProviderSession {
            attachment,
            provider,
            ops,
        }
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ops(&self) -> &P::Ops {
        &self.ops
    }

    pub fn ops_mut(&mut self) -> &mut P::Ops {
        &mut self.ops
    }

    /// Detach, keeping the constructed operations.
    pub fn into_ops(self) -> P::Ops {
        self.ops
    }
}
