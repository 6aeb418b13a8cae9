use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

impl TypeId {
    /// Root of every hierarchy. Untyped declarations land here.
    pub const OBJECT: TypeId = TypeId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Type hierarchy. Each type has at most one parent; `object` has none.
#[derive(Clone, Debug)]
pub struct Types {
    names: Vec<String>,
    parents: Vec<Option<TypeId>>,
    mapping: HashMap<String, TypeId>,
}

impl Default for Types {
    fn default() -> Self {
        Self::new()
    }
}

impl Types {
    pub fn new() -> Self {
        let mut mapping = HashMap::new();
        mapping.insert(String::from("object"), TypeId::OBJECT);
        Self { names: vec![String::from("object")], parents: vec![None], mapping }
    }

    /// Returns the id for `name`, creating a child of `object` if it is new.
    pub fn declare(&mut self, name: &str) -> TypeId {
        if let Some(id) = self.mapping.get(name) {
            return *id;
        }
        let id = TypeId(self.names.len());
        self.names.push(name.to_owned());
        self.parents.push(Some(TypeId::OBJECT));
        self.mapping.insert(name.to_owned(), id);
        id
    }

    pub fn set_parent(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        if child == TypeId::OBJECT {
            return Err(Error::structural("type object cannot have a parent"));
        }
        if self.is_subtype(parent, child) {
            return Err(Error::structural(format!(
                "type {} cannot extend {}: the hierarchy would be cyclic",
                self.name(child),
                self.name(parent)
            )));
        }
        self.parents[child.0] = Some(parent);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.mapping.get(name).copied()
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.names[id.0]
    }

    pub fn parent(&self, id: TypeId) -> Option<TypeId> {
        self.parents[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when `kind` is `ancestor` or inherits from it.
    pub fn is_subtype(&self, kind: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(kind);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parents[k.0];
        }
        false
    }
}

/// Named objects in declaration order. Domain constants come first.
#[derive(Clone, Debug, Default)]
pub struct Objects {
    names: Vec<String>,
    kinds: Vec<TypeId>,
    mapping: HashMap<String, ObjectId>,
}

impl Objects {
    pub fn insert(&mut self, name: &str, kind: TypeId) -> Result<ObjectId> {
        if self.mapping.contains_key(name) {
            return Err(Error::structural(format!("object {} is declared more than once", name)));
        }
        let id = ObjectId(self.names.len());
        self.names.push(name.to_owned());
        self.kinds.push(kind);
        self.mapping.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.mapping.get(name).copied()
    }

    pub fn name(&self, id: ObjectId) -> &str {
        &self.names[id.0]
    }

    pub fn kind(&self, id: ObjectId) -> TypeId {
        self.kinds[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.names.len()).map(ObjectId)
    }
}

/// type -> objects of that type or any subtype. Built once per problem.
#[derive(Clone, Debug)]
pub struct TypeIndex(Vec<Vec<ObjectId>>);

impl TypeIndex {
    pub fn build(types: &Types, objects: &Objects) -> Self {
        let mut index = vec![Vec::new(); types.len()];
        for object in objects.ids() {
            let mut current = Some(objects.kind(object));
            while let Some(kind) = current {
                index[kind.0].push(object);
                current = types.parent(kind);
            }
        }
        Self(index)
    }

    pub fn objects_of(&self, kind: TypeId) -> &[ObjectId] {
        self.0.get(kind.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectId, Objects, TypeId, TypeIndex, Types};

    fn hierarchy() -> Types {
        let mut types = Types::new();
        let target = types.declare("target");
        let field = types.declare("field");
        let screen = types.declare("screen");
        types.set_parent(field, target).unwrap();
        types.set_parent(screen, TypeId::OBJECT).unwrap();
        types
    }

    #[test]
    fn test_subtypes() {
        let types = hierarchy();
        let field = types.get("field").unwrap();
        let target = types.get("target").unwrap();
        assert!(types.is_subtype(field, target));
        assert!(types.is_subtype(field, TypeId::OBJECT));
        assert!(!types.is_subtype(target, field));
        assert_eq!(types.name(field), "field");
    }

    #[test]
    fn test_cycle_rejected() {
        let mut types = hierarchy();
        let field = types.get("field").unwrap();
        let target = types.get("target").unwrap();
        assert!(types.set_parent(target, field).is_err());
        assert!(types.set_parent(TypeId::OBJECT, target).is_err());
    }

    #[test]
    fn test_type_index_includes_subtypes() {
        let types = hierarchy();
        let mut objects = Objects::default();
        objects.insert("icon", types.get("target").unwrap()).unwrap();
        objects.insert("body", types.get("field").unwrap()).unwrap();
        objects.insert("home", types.get("screen").unwrap()).unwrap();
        assert!(objects.insert("home", TypeId::OBJECT).is_err());

        let index = TypeIndex::build(&types, &objects);
        assert_eq!(index.objects_of(types.get("target").unwrap()), &[ObjectId(0), ObjectId(1)]);
        assert_eq!(index.objects_of(types.get("field").unwrap()), &[ObjectId(1)]);
        assert_eq!(index.objects_of(TypeId::OBJECT).len(), 3);
        assert!(index.objects_of(TypeId(42)).is_empty());
    }
}
