//! Codec layers and the immutable registry composed from them.

use std::{any::Any, collections::HashMap, fmt, sync::Arc};

use mongonull_core::{ValueReader, ValueWriter};
use tracing::debug;

use crate::{
    codec::{DecodeContext, EncodeContext, ValueDecoder, ValueEncoder},
    error::{DecodeError, EncodeError, LookupError},
    host::HostType,
};

/// An ordered, named set of encoder/decoder registrations.
///
/// Layers are combined by [`build_registry`]; within and across layers the
/// last registration for a host type wins.
#[derive(Clone)]
pub struct CodecSet {
    name: &'static str,
    encoders: Vec<(HostType, Arc<dyn ValueEncoder>)>,
    decoders: Vec<(HostType, Arc<dyn ValueDecoder>)>,
}

impl CodecSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            encoders: Vec::new(),
            decoders: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn with_encoder<T: Any>(mut self, encoder: impl ValueEncoder + 'static) -> Self {
        let encoder: Arc<dyn ValueEncoder> = Arc::new(encoder);
        self.encoders.push((HostType::of::<T>(), encoder));
        self
    }

    pub fn with_decoder<T: Any>(mut self, decoder: impl ValueDecoder + 'static) -> Self {
        let decoder: Arc<dyn ValueDecoder> = Arc::new(decoder);
        self.decoders.push((HostType::of::<T>(), decoder));
        self
    }

    /// Register one codec instance as both encoder and decoder for `T`.
    pub fn with_codec<T: Any, C>(mut self, codec: C) -> Self
    where
        C: ValueEncoder + ValueDecoder + 'static,
    {
        let host = HostType::of::<T>();
        let codec = Arc::new(codec);
        let encoder: Arc<dyn ValueEncoder> = codec.clone();
        let decoder: Arc<dyn ValueDecoder> = codec;
        self.encoders.push((host, encoder));
        self.decoders.push((host, decoder));
        self
    }

    /// Host types with an encoder in this set, in registration order.
    pub fn encoder_hosts(&self) -> impl Iterator<Item = HostType> + '_ {
        self.encoders.iter().map(|(host, _)| *host)
    }

    /// Host types with a decoder in this set, in registration order.
    pub fn decoder_hosts(&self) -> impl Iterator<Item = HostType> + '_ {
        self.decoders.iter().map(|(host, _)| *host)
    }
}

impl fmt::Debug for CodecSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecSet")
            .field("name", &self.name)
            .field("encoders", &self.encoders.len())
            .field("decoders", &self.decoders.len())
            .finish()
    }
}

/// Immutable lookup table from host type to encoder and decoder.
///
/// Built once by [`build_registry`] and never mutated afterwards, so a shared
/// reference can be used from any number of threads.
pub struct Registry {
    encoders: HashMap<HostType, Arc<dyn ValueEncoder>>,
    decoders: HashMap<HostType, Arc<dyn ValueDecoder>>,
}

/// Compose codec layers into a [`Registry`].
///
/// Layers are applied in iteration order. A registration replaces any earlier
/// one for the same host type, so later layers shadow earlier ones only for
/// the exact types they register.
pub fn build_registry(layers: impl IntoIterator<Item = CodecSet>) -> Registry {
    let mut encoders = HashMap::new();
    let mut decoders = HashMap::new();

    for layer in layers {
        debug!(
            layer = layer.name,
            encoders = layer.encoders.len(),
            decoders = layer.decoders.len(),
            "composing codec layer"
        );
        for (host, encoder) in layer.encoders {
            if encoders.insert(host, encoder).is_some() {
                debug!(layer = layer.name, host = %host, "encoder shadows earlier registration");
            }
        }
        for (host, decoder) in layer.decoders {
            if decoders.insert(host, decoder).is_some() {
                debug!(layer = layer.name, host = %host, "decoder shadows earlier registration");
            }
        }
    }

    Registry { encoders, decoders }
}

impl Registry {
    pub fn lookup_encoder(&self, host: HostType) -> Result<&Arc<dyn ValueEncoder>, LookupError> {
        self.encoders
            .get(&host)
            .ok_or(LookupError::NoEncoder { host })
    }

    pub fn lookup_decoder(&self, host: HostType) -> Result<&Arc<dyn ValueDecoder>, LookupError> {
        self.decoders
            .get(&host)
            .ok_or(LookupError::NoDecoder { host })
    }

    pub fn encoder_count(&self) -> usize {
        self.encoders.len()
    }

    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }

    /// Encode `value` with the encoder registered for `T`.
    pub fn encode_value<T: Any>(
        &self,
        vw: &mut dyn ValueWriter,
        value: &T,
    ) -> Result<(), EncodeError> {
        let encoder = self.lookup_encoder(HostType::of::<T>())?;
        encoder.encode_value(&EncodeContext::new(self), vw, value)
    }

    /// Decode the value `vr` is positioned on into `dest`.
    pub fn decode_into<T: Any>(
        &self,
        vr: &mut dyn ValueReader,
        dest: &mut T,
    ) -> Result<(), DecodeError> {
        let decoder = self.lookup_decoder(HostType::of::<T>())?;
        decoder.decode_value(&DecodeContext::new(self), vr, dest)
    }

    /// Decode the value `vr` is positioned on into a fresh `T`.
    pub fn decode_value<T: Any + Default>(
        &self,
        vr: &mut dyn ValueReader,
    ) -> Result<T, DecodeError> {
        let mut out = T::default();
        self.decode_into(vr, &mut out)?;
        Ok(out)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("encoders", &self.encoders.len())
            .field("decoders", &self.decoders.len())
            .finish()
    }
}
