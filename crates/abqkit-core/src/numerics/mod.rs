pub mod sphere;

pub use sphere::{
    ElasticConstants, Layer, LayeredSphere, SelfCompression, SphereError, self_compression,
};
