//! Contract tests for the bytecode system public API

mod test_contract_compliance;
