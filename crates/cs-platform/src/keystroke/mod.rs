mod enigo_emitter;

pub use enigo_emitter::EnigoKeystrokeEmitter;
