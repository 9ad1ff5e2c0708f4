// Pipeline processing: parsing, coercion, normalization and ranking

pub mod coerce;
pub mod normalize;
pub mod parser;
pub mod rank;
