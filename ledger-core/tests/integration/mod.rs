mod async_execution;
mod config_loading;
mod execution_flow;
mod transaction_expiry;
