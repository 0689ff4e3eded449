pub mod dataset;
pub mod normalize;

pub use dataset::{
    create_dataset, create_dataset_by_name, DataPoint, Dataset, DatasetDefinition, DatasetId,
    DATASET_OPTIONS,
};
pub use normalize::{normalize_dataset, standardize, NormalizedDataset};
