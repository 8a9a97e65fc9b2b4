/// Contains the helm command line argument builders.
pub mod args;

/// Contains the helm client which runs chart operations against one cluster.
pub mod client;

/// Contains the helm chart repository entries.
pub mod repo;

/// Contains the chart operation request types.
pub mod request;

/// Contains the lifecycle of rendered values files.
pub mod values;
