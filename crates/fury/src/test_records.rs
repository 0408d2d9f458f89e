//! Hand-written records shared by unit tests.

use crate::error::{OrmError, OrmResult};
use crate::record::{FieldMeta, Record};
use crate::value::{FromValue, Value};

fn assign<T: FromValue>(slot: &mut T, name: &str, value: Value) -> OrmResult<()> {
    *slot = T::from_value(value).map_err(|e| OrmError::decode(name, e.to_string()))?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub user_id: i32,
    pub counter: i32,
}

impl Record for User {
    const NAME: &'static str = "user";

    fn fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta::new("UserID", "primary_key", false),
            FieldMeta::new("Counter", "auto_increment", false),
        ];
        FIELDS
    }

    fn value(&self, index: usize) -> Value {
        match index {
            0 => self.user_id.into(),
            1 => self.counter.into(),
            _ => Value::Null,
        }
    }

    fn is_zero(&self, index: usize) -> bool {
        match index {
            0 => self.user_id == 0,
            1 => self.counter == 0,
            _ => false,
        }
    }

    fn set_value(&mut self, index: usize, value: Value) -> OrmResult<()> {
        match index {
            0 => assign(&mut self.user_id, "userid", value),
            1 => assign(&mut self.counter, "counter", value),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub session: String,
}

impl Record for Account {
    const NAME: &'static str = "account";

    fn fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta::new("ID", "primary_key, auto_increment", false),
            FieldMeta::new("Name", "", false),
            FieldMeta::new("Email", "", false),
            FieldMeta::new("Session", "", true),
        ];
        FIELDS
    }

    fn value(&self, index: usize) -> Value {
        match index {
            0 => self.id.into(),
            1 => self.name.clone().into(),
            2 => self.email.clone().into(),
            _ => Value::Null,
        }
    }

    fn is_zero(&self, index: usize) -> bool {
        match index {
            0 => self.id == 0,
            1 => self.name.is_empty(),
            2 => self.email.is_none(),
            _ => false,
        }
    }

    fn set_value(&mut self, index: usize, value: Value) -> OrmResult<()> {
        match index {
            0 => assign(&mut self.id, "id", value),
            1 => assign(&mut self.name, "name", value),
            2 => assign(&mut self.email, "email", value),
            _ => Ok(()),
        }
    }
}

/// Composite primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    pub group_id: i32,
    pub user_id: i32,
    pub role: String,
}

impl Record for Membership {
    const NAME: &'static str = "membership";

    fn fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta::new("GroupID", "PRIMARY_KEY", false),
            FieldMeta::new("UserID", "primary_key", false),
            FieldMeta::new("Role", "", false),
        ];
        FIELDS
    }

    fn value(&self, index: usize) -> Value {
        match index {
            0 => self.group_id.into(),
            1 => self.user_id.into(),
            2 => self.role.clone().into(),
            _ => Value::Null,
        }
    }

    fn is_zero(&self, index: usize) -> bool {
        match index {
            0 => self.group_id == 0,
            1 => self.user_id == 0,
            2 => self.role.is_empty(),
            _ => false,
        }
    }

    fn set_value(&mut self, index: usize, value: Value) -> OrmResult<()> {
        match index {
            0 => assign(&mut self.group_id, "groupid", value),
            1 => assign(&mut self.user_id, "userid", value),
            2 => assign(&mut self.role, "role", value),
            _ => Ok(()),
        }
    }
}

/// Two attributes whose names collide once lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shadowed {
    pub first: String,
    pub second: String,
}

impl Record for Shadowed {
    const NAME: &'static str = "shadowed";

    fn fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta::new("Label", "", false),
            FieldMeta::new("label", "primary_key", false),
        ];
        FIELDS
    }

    fn value(&self, index: usize) -> Value {
        match index {
            0 => self.first.clone().into(),
            1 => self.second.clone().into(),
            _ => Value::Null,
        }
    }

    fn is_zero(&self, index: usize) -> bool {
        match index {
            0 => self.first.is_empty(),
            1 => self.second.is_empty(),
            _ => false,
        }
    }

    fn set_value(&mut self, index: usize, value: Value) -> OrmResult<()> {
        match index {
            0 => assign(&mut self.first, "label", value),
            1 => assign(&mut self.second, "label", value),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fieldless;

impl Record for Fieldless {
    const NAME: &'static str = "fieldless";

    fn fields() -> &'static [FieldMeta] {
        &[]
    }

    fn value(&self, _index: usize) -> Value {
        Value::Null
    }

    fn is_zero(&self, _index: usize) -> bool {
        false
    }

    fn set_value(&mut self, _index: usize, _value: Value) -> OrmResult<()> {
        Ok(())
    }
}
