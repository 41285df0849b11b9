use std::{collections::HashMap, sync::Arc};

use kstring::KString;
use serde::{Deserialize, Serialize};

/// A bookable time slot, as declared in the configuration file.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct SlotConfig {
	/// Display name of the slot, e.g. `09:00`.
	pub name: KString,
	/// How many appointments may share this slot on one day.
	#[serde(default = "default_capacity")]
	pub capacity: u32,
}

fn default_capacity() -> u32 {
	1
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct SlotInfo {
	pub name: KString,
	pub capacity: u32,
}

/// Registry of configured appointment time slots.
///
/// Built once from configuration at startup; there is no implicit
/// refresh, changing slots requires a restart.
#[derive(Debug)]
pub struct SlotService {
	ordered: Vec<Arc<SlotInfo>>,
	by_name: HashMap<KString, Arc<SlotInfo>>,
}

impl SlotService {
	pub fn new(config: &[SlotConfig]) -> Self {
		let mut service = Self {
			ordered: Vec::with_capacity(config.len()),
			by_name: HashMap::with_capacity(config.len()),
		};

		for slot in config {
			// a duplicated name keeps the first declaration, so lookup
			// and iteration always agree
			if service.by_name.contains_key(&slot.name) {
				continue;
			}
			let info = Arc::new(SlotInfo {
				name: slot.name.clone(),
				capacity: slot.capacity,
			});
			service.by_name.insert(info.name.clone(), info.clone());
			service.ordered.push(info);
		}

		service
	}

	pub fn get(&self, name: &str) -> Option<&Arc<SlotInfo>> {
		self.by_name.get(name)
	}

	/// Slots in configuration order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<SlotInfo>> {
		self.ordered.iter()
	}

	pub fn len(&self) -> usize {
		self.ordered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ordered.is_empty()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn slot(name: &str, capacity: u32) -> SlotConfig {
		SlotConfig {
			name: KString::from_ref(name),
			capacity,
		}
	}

	#[test]
	fn test_lookup() {
		let service = SlotService::new(&[slot("09:00", 2), slot("10:00", 1)]);
		assert_eq!(service.len(), 2);
		assert_eq!(service.get("09:00").unwrap().capacity, 2);
		assert!(service.get("11:00").is_none());
	}

	#[test]
	fn test_duplicate_names() {
		let service = SlotService::new(&[slot("09:00", 2), slot("09:00", 5)]);
		assert_eq!(service.len(), 1);
		// the first declaration wins, for lookup and iteration alike
		let looked_up = service.get("09:00").unwrap();
		assert_eq!(looked_up.capacity, 2);
		let listed = service.iter().next().unwrap();
		assert_eq!(listed.capacity, looked_up.capacity);
	}
}
