use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    ForeignKey,
    OneToOne,
    ManyToMany,
    /// Reverse side of a foreign key.
    ManyToOneRel,
    /// Reverse side of a one-to-one.
    OneToOneRel,
    /// Reverse side of a many-to-many.
    ManyToManyRel,
}

impl RelationKind {
    /// The related id is stored on the declaring record under the field name.
    pub fn is_inlined(&self) -> bool {
        matches!(self, RelationKind::ForeignKey | RelationKind::OneToOne)
    }

    pub fn is_to_many(&self) -> bool {
        matches!(
            self,
            RelationKind::ManyToMany | RelationKind::ManyToOneRel | RelationKind::ManyToManyRel
        )
    }

    pub fn is_many_to_many(&self) -> bool {
        matches!(self, RelationKind::ManyToMany | RelationKind::ManyToManyRel)
    }

    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            RelationKind::ManyToOneRel | RelationKind::OneToOneRel | RelationKind::ManyToManyRel
        )
    }
}

/// What happens to referencing rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnDelete {
    #[default]
    Cascade,
    SetNull,
    Protect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationField {
    pub name: String,
    /// Name of the model declaring the field.
    pub model: String,
    pub kind: RelationKind,
    pub related_model: String,
    /// The field on the related model forming the other side, if it is exposed.
    pub related_field: Option<String>,
    pub is_nullable: bool,
    pub is_blank: bool,
    pub is_editable: bool,
    pub on_delete: OnDelete,
    pub description: Option<String>,
}

impl RelationField {
    pub fn is_inlined(&self) -> bool {
        self.kind.is_inlined()
    }

    pub fn is_to_many(&self) -> bool {
        self.kind.is_to_many()
    }

    pub fn is_required(&self) -> bool {
        self.is_inlined() && !self.is_nullable && !self.is_blank
    }

    /// Key of the join table backing a many-to-many field and whether this field is its
    /// forward side. Both sides of one relation resolve to the same key.
    pub fn join_table(&self) -> Option<(String, bool)> {
        match self.kind {
            RelationKind::ManyToMany => Some((format!("{}.{}", self.model, self.name), true)),
            RelationKind::ManyToManyRel => self
                .related_field
                .as_ref()
                .map(|forward| (format!("{}.{}", self.related_model, forward), false)),
            _ => None,
        }
    }
}
