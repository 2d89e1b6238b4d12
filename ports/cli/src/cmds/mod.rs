pub(crate) mod describe;
pub(crate) mod likelihood;
pub(crate) mod sample;
pub(crate) mod simulate;
