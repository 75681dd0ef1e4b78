//! Entity registration
//!
//! The ORM module needs to know which entities the application declares so
//! schema sync can create (or drop) their tables. Entities are registered by
//! type and captured as statement builders.

use sea_orm::sea_query::{Alias, Table, TableCreateStatement, TableDropStatement};
use sea_orm::{EntityName, EntityTrait, Schema};

/// One registered entity
#[derive(Clone)]
pub struct EntityDef {
    table: String,
    type_name: &'static str,
    create: fn(&Schema) -> TableCreateStatement,
}

impl EntityDef {
    /// Capture an entity type
    pub fn of<E: EntityTrait + Default>() -> Self {
        Self {
            table: E::default().table_name().to_owned(),
            type_name: std::any::type_name::<E>(),
            create: |schema| schema.create_table_from_entity(E::default()),
        }
    }

    /// Table the entity maps to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Rust type name, for logs
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `CREATE TABLE` for the given backend schema
    pub fn create_statement(&self, schema: &Schema) -> TableCreateStatement {
        (self.create)(schema)
    }

    /// `DROP TABLE IF EXISTS`
    pub fn drop_statement(&self) -> TableDropStatement {
        Table::drop()
            .table(Alias::new(self.table.as_str()))
            .if_exists()
            .to_owned()
    }
}

impl std::fmt::Debug for EntityDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDef")
            .field("table", &self.table)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// The entity list of an ORM module, in declaration order
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<EntityDef>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, ignoring a second registration of the same table
    pub fn register<E: EntityTrait + Default>(&mut self) {
        let def = EntityDef::of::<E>();
        if self.contains(def.table()) {
            tracing::warn!(table = def.table(), "entity registered twice, ignoring");
            return;
        }
        self.entities.push(def);
    }

    pub fn contains(&self, table: &str) -> bool {
        self.entities.iter().any(|e| e.table() == table)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EntityDef> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Table names in declaration order
    pub fn tables(&self) -> Vec<&str> {
        self.entities.iter().map(EntityDef::table).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal entities shared by the database tests

    pub mod department {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "departments")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub title: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    pub mod badge {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "badges")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            #[sea_orm(unique)]
            pub code: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }
}
