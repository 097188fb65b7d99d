//! Binding flat record lists onto entity lists.

use indexmap::IndexMap;

use crate::cache::struct_info;
use crate::reflect::{deref_value, field_at_path, field_at_path_mut};
use crate::scalar::to_string;
use crate::scan::list_item;
use crate::tag::fuzzy_key;
use crate::{ConvertError, Converter, Def, Object, Peek, Poke, Reflect, Shape, Value};

/// `"record_key:attr"`, `"record_key=attr"` or `"key"` for both.
struct Relation<'a> {
    record_key: &'a str,
    attr: &'a str,
}

impl<'a> Relation<'a> {
    fn parse(relation: &'a str) -> Option<Self> {
        let relation = relation.trim();
        if relation.is_empty() {
            return None;
        }
        let (record_key, attr) = relation
            .split_once([':', '='])
            .map_or((relation, relation), |(k, a)| (k.trim(), a.trim()));
        Some(Relation { record_key, attr })
    }
}

impl Converter {
    /// Binds `records`, a list of map-like rows, onto the `bind_to` attribute
    /// of each entity in `entities`.
    ///
    /// Without a `relation`, record `i` binds onto entity `i`; an empty
    /// entity list is first grown to the number of records.
    ///
    /// With a `relation` such as `"uid:Uid"`, records are grouped by their
    /// `uid` value, and each entity picks the group whose key equals its
    /// `Uid` attribute (looked up inside `relation_attr` when that is not
    /// empty). A list attribute receives the whole group; any other
    /// attribute receives the group's first record.
    pub fn scan_list(
        &self,
        records: &dyn Reflect,
        entities: &mut dyn Reflect,
        bind_to: &str,
        relation_attr: &str,
        relation: &str,
    ) -> Result<(), ConvertError> {
        if bind_to.trim().is_empty() {
            return Err(ConvertError::invalid_argument("scan_list needs an attribute to bind to"));
        }
        let Some(entity_shape) = list_item(entities.shape()).map(Shape::innermost) else {
            return Err(ConvertError::invalid_argument(format!(
                "scan_list entities must be a list of structs, got {}",
                entities.shape()
            )));
        };
        let target_shape = self.attr_shape(entity_shape, bind_to)?;
        let many = list_item(target_shape).is_some();
        if !relation_attr.is_empty() {
            self.attr_shape(entity_shape, relation_attr)?;
        }

        let records = self.maps(records)?.unwrap_or_default();
        if records.is_empty() {
            return Ok(());
        }
        let Some(list) = innermost_mut(entities) else {
            return Ok(());
        };
        let Poke::List(list) = list.poke() else {
            return Err(ConvertError::internal("scan_list entities lost their list shape"));
        };

        let Some(relation) = Relation::parse(relation) else {
            if many {
                return Err(ConvertError::invalid_argument(format!(
                    "scan_list attribute {bind_to} is a list and needs a relation"
                )));
            }
            if list.is_empty() {
                list.resize(records.len());
            }
            for (index, record) in records.into_iter().enumerate() {
                let Some(entity) = list.get_mut(index) else {
                    break;
                };
                let target = self.attr_mut(entity, bind_to)?;
                self.binder().bind(&Value::Object(record), target, 0)?;
            }
            return Ok(());
        };

        let wanted = fuzzy_key(relation.record_key);
        let Some(record_key) = records[0].keys().find(|k| fuzzy_key(k) == wanted).cloned() else {
            return Err(ConvertError::invalid_argument(format!(
                "scan_list relation key {} is not in the records",
                relation.record_key
            )));
        };
        let mut groups: IndexMap<String, Vec<&Object>> = IndexMap::new();
        for record in &records {
            if let Some(key) = record.get(&record_key) {
                groups.entry(to_string(key)?).or_default().push(record);
            }
        }
        trace!("scan_list: {} groups by {record_key}", groups.len());

        for index in 0..list.len() {
            let key = {
                let Some(entity) = list.get(index).and_then(deref_value) else {
                    continue;
                };
                let holder = if relation_attr.is_empty() {
                    entity
                } else {
                    self.attr(entity, relation_attr)?
                };
                to_string(self.attr(holder, relation.attr)?)?
            };
            let Some(group) = groups.get(&key) else {
                continue;
            };
            let Some(entity) = list.get_mut(index) else {
                continue;
            };
            let source = if many {
                group.iter().map(|r| Value::Object((*r).clone())).collect::<Value>()
            } else {
                Value::Object(group[0].clone())
            };
            let target = self.attr_mut(entity, bind_to)?;
            self.binder().bind(&source, target, 0)?;
        }
        Ok(())
    }

    fn attr_shape(&self, owner: &'static Shape, name: &str) -> Result<&'static Shape, ConvertError> {
        let info = struct_info(owner, self.priority_tags());
        match info.find_fuzzy(name) {
            Some(index) => Ok(info.fields[index].shape),
            None => Err(unknown_attr(owner, name)),
        }
    }

    /// The attribute `name` of a (possibly wrapped) struct value.
    fn attr<'a>(&self, owner: &'a dyn Reflect, name: &str) -> Result<&'a dyn Reflect, ConvertError> {
        let owner = deref_value(owner)
            .filter(|o| matches!(o.peek(), Peek::Struct(_)))
            .ok_or_else(|| unknown_attr(owner.shape(), name))?;
        let info = struct_info(owner.shape(), self.priority_tags());
        info.find_fuzzy(name)
            .and_then(|index| field_at_path(owner, &info.fields[index].path))
            .ok_or_else(|| unknown_attr(owner.shape(), name))
    }

    /// The attribute `name` of a (possibly wrapped) struct value, mutably.
    /// Empty `Option`s on the way are filled with defaults.
    fn attr_mut<'a>(&self, owner: &'a mut dyn Reflect, name: &str) -> Result<&'a mut dyn Reflect, ConvertError> {
        let shape = owner.shape();
        let owner = innermost_mut(owner).ok_or_else(|| unknown_attr(shape, name))?;
        let shape = owner.shape();
        let info = struct_info(shape, self.priority_tags());
        let index = info.find_fuzzy(name).ok_or_else(|| unknown_attr(shape, name))?;
        match owner.poke() {
            Poke::Struct(s) => field_at_path_mut(s, &info.fields[index].path).ok_or_else(|| unknown_attr(shape, name)),
            _ => Err(unknown_attr(shape, name)),
        }
    }
}

fn unknown_attr(owner: &Shape, name: &str) -> ConvertError {
    ConvertError::invalid_argument(format!("{owner} has no attribute {name}"))
}

/// Follows `Box` and `Option` layers, filling empty options with defaults.
fn innermost_mut(value: &mut dyn Reflect) -> Option<&mut dyn Reflect> {
    if !matches!(value.shape().def, Def::Option(_) | Def::Pointer(_)) {
        return Some(value);
    }
    match value.poke() {
        Poke::Pointer(inner) => innermost_mut(inner),
        Poke::Option(slot) => innermost_mut(slot.get_or_insert_default()),
        _ => None,
    }
}
