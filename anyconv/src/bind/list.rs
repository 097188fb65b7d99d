//! Binding into `Vec<T>` and `[T; N]`.

use super::Binder;
use crate::error::{ConvertError, PathSegment};
use crate::{List, Peek, Reflect, ScalarRef};

impl Binder<'_> {
    /// Binds a source into a sequence.
    ///
    /// Lists bind item by item; a fixed-size destination takes as many
    /// items as fit and leaves the rest untouched. Empty text leaves the
    /// destination as it is. Any other single value becomes a one-element
    /// list. With `continue_on_error`, items that fail to bind are reset to
    /// their default.
    pub(super) fn bind_list(&self, src: &dyn Reflect, dst: &mut dyn List, depth: usize) -> Result<(), ConvertError> {
        match src.peek() {
            Peek::List(items) => {
                let len = items.len();
                let len = if dst.resize(len) { len } else { len.min(dst.len()) };
                for index in 0..len {
                    let (Some(item), Some(slot)) = (items.get(index), dst.get_mut(index)) else {
                        break;
                    };
                    if let Err(err) = self.bind(item, slot, depth) {
                        let err = err.with_path(PathSegment::Index(index));
                        if !self.continue_on_error {
                            return Err(err);
                        }
                        debug!("resetting item: {err}");
                        if let Some(slot) = dst.get_mut(index) {
                            slot.reset();
                        }
                    }
                }
                Ok(())
            }
            Peek::Scalar(ScalarRef::Str(s)) if s.is_empty() => Ok(()),
            Peek::Scalar(ScalarRef::Bytes(b)) if b.is_empty() => Ok(()),
            _ => {
                if !dst.resize(1) && dst.is_empty() {
                    return Ok(());
                }
                match dst.get_mut(0) {
                    Some(slot) => self
                        .bind(src, slot, depth)
                        .map_err(|err| err.with_path(PathSegment::Index(0))),
                    None => Ok(()),
                }
            }
        }
    }
}

