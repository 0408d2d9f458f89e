use super::descriptor::{ModelDescriptor, Slot, introspect};
use crate::error::{OrmError, OrmResult};
use crate::record::{Record, Target};
use crate::value::Value;

/// Descriptors for a destination plus an index-based iteration cursor.
///
/// The destination is owned here for the duration of one operation; the
/// cursor addresses records by position, so the caller's vector can grow
/// while it is being walked.
#[derive(Debug)]
pub struct Models<'a, R: Record> {
    target: Target<'a, R>,
    list: Vec<ModelDescriptor>,
    primary: ModelDescriptor,
    template: Option<R>,
    cursor: Option<usize>,
}

impl<'a, R: Record> Models<'a, R> {
    /// Introspect `target` and position the cursor before the first descriptor.
    pub fn new(target: Target<'a, R>) -> OrmResult<Self> {
        let (list, primary) = introspect(&target)?;
        let template = (primary.slot() == Slot::Template).then(R::default);
        Ok(Self {
            target,
            list,
            primary,
            template,
            cursor: None,
        })
    }

    pub fn primary(&self) -> &ModelDescriptor {
        &self.primary
    }

    /// All pre-existing (or grown) descriptors, in destination order.
    pub fn descriptors(&self) -> &[ModelDescriptor] {
        &self.list
    }

    pub fn get(&self, index: usize) -> Option<&ModelDescriptor> {
        self.list.get(index)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Descriptor under the cursor, if it has been advanced.
    pub fn current(&self) -> Option<&ModelDescriptor> {
        self.cursor.and_then(|i| self.list.get(i))
    }

    /// Move the cursor back before the first descriptor.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Drop list records at or past `len` along with their descriptors.
    ///
    /// Single-record destinations are left alone.
    pub fn truncate(&mut self, len: usize) {
        let Target::Many(records) = &mut self.target else {
            return;
        };
        records.truncate(len);
        self.list
            .retain(|model| matches!(model.slot(), Slot::Element(i) if i < len));
        if self.cursor.is_some_and(|i| i >= self.list.len()) {
            self.cursor = self.list.len().checked_sub(1);
        }
    }

    /// Record bound to `model`.
    pub fn record(&self, model: &ModelDescriptor) -> Option<&R> {
        match (model.slot(), &self.target) {
            (Slot::One, Target::One(record)) => Some(&**record),
            (Slot::Element(i), Target::Many(records)) => records.get(i),
            (Slot::Template, _) => self.template.as_ref(),
            _ => None,
        }
    }

    fn record_mut(&mut self, slot: Slot) -> Option<&mut R> {
        match (slot, &mut self.target) {
            (Slot::One, Target::One(record)) => Some(&mut **record),
            (Slot::Element(i), Target::Many(records)) => records.get_mut(i),
            (Slot::Template, _) => self.template.as_mut(),
            _ => None,
        }
    }

    /// Move to the next pre-existing descriptor and return its index.
    ///
    /// Returns `None` without moving once the last descriptor is reached.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.list.len() {
            self.cursor = Some(next);
            Some(next)
        } else {
            None
        }
    }

    /// Like [`advance`](Self::advance), but grows a list destination by one
    /// zero-value record when its end is reached.
    ///
    /// A single-record destination never grows.
    pub fn advance_or_grow(&mut self) -> OrmResult<Option<usize>> {
        if let Some(next) = self.advance() {
            return Ok(Some(next));
        }

        let Target::Many(records) = &mut self.target else {
            return Ok(None);
        };

        let model = ModelDescriptor::new::<R>(Slot::Element(records.len()))?;
        records.push(R::default());
        self.list.push(model);

        let next = self.list.len() - 1;
        self.cursor = Some(next);
        Ok(Some(next))
    }

    /// Write one result row into the record behind descriptor `index`.
    ///
    /// `columns` and `values` are parallel; columns without a matching field
    /// are skipped.
    pub fn materialize<S: AsRef<str>>(
        &mut self,
        index: usize,
        columns: &[S],
        mut values: Vec<Value>,
    ) -> OrmResult<()> {
        if columns.len() != values.len() {
            return Err(OrmError::mismatch(format!(
                "row has {} values for {} columns",
                values.len(),
                columns.len()
            )));
        }

        let model = self
            .list
            .get(index)
            .ok_or_else(|| OrmError::mismatch(format!("no model at cursor position {index}")))?;
        let slot = model.slot();
        let bindings: Vec<(usize, usize)> = model
            .bindings(columns)
            .into_iter()
            .map(|(pos, field)| (pos, field.index()))
            .collect();

        let record = self
            .record_mut(slot)
            .ok_or_else(|| OrmError::mismatch(format!("model slot {slot:?} is not bound")))?;
        for (pos, field) in bindings {
            record.set_value(field, std::mem::take(&mut values[pos]))?;
        }
        Ok(())
    }
}
