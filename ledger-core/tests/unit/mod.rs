mod node_backoff;
mod node_selection;
mod signing_keys;
mod transaction_builder;
