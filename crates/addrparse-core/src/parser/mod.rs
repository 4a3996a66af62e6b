pub mod pipeline;
pub mod preprocess;
pub mod resolver;

pub use pipeline::{parse_address, AddressParser, Completeness, ParserConfig};
pub use preprocess::{PreprocessedAddress, Preprocessor};
pub use resolver::TokenResolver;
