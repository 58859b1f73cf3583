use cud_value::CudValue;
use indexmap::{map::Keys, IndexMap};

/// WriteArgs represent data to be written to an underlying data source, keyed by model
/// field name. Foreign keys carry the related record's id under the relation field name.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct WriteArgs {
    pub args: IndexMap<String, CudValue>,
}

impl From<IndexMap<String, CudValue>> for WriteArgs {
    fn from(args: IndexMap<String, CudValue>) -> Self {
        Self { args }
    }
}

impl WriteArgs {
    pub fn new() -> Self {
        Self { args: IndexMap::new() }
    }

    pub fn insert<T, V>(&mut self, key: T, arg: V)
    where
        T: Into<String>,
        V: Into<CudValue>,
    {
        self.args.insert(key.into(), arg.into());
    }

    pub fn has_arg_for(&self, field: &str) -> bool {
        self.args.contains_key(field)
    }

    pub fn get_field_value(&self, field: &str) -> Option<&CudValue> {
        self.args.get(field)
    }

    pub fn take_field_value(&mut self, field: &str) -> Option<CudValue> {
        self.args.shift_remove(field)
    }

    pub fn keys(&self) -> Keys<'_, String, CudValue> {
        self.args.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CudValue)> {
        self.args.iter()
    }
}

impl IntoIterator for WriteArgs {
    type Item = (String, CudValue);
    type IntoIter = indexmap::map::IntoIter<String, CudValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.into_iter()
    }
}
