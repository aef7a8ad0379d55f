pub mod assessment;
pub mod compliance;
pub mod item_bank;
pub mod learner_store;
pub mod rewards;
