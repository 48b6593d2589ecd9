use crate::state::Equipment;

/// Read-only equipment catalog used when claiming rewards.
pub trait EquipmentOracle: Send + Sync {
    fn equipment(&self, id: &str) -> Option<Equipment>;

    fn equipment_ids(&self) -> Vec<String>;
}
