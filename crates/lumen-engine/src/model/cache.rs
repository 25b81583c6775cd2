use std::collections::HashMap;
use std::rc::Rc;

use crate::texture::{TextureError, Texture2d};

/// Textures keyed by where their pixels came from, so every mesh that
/// references the same image shares one GPU texture.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Rc<Texture2d>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached texture for `key`, creating it with `create` on a miss.
    pub fn get_or_try_insert(
        &mut self,
        key: &str,
        create: impl FnOnce() -> Result<Texture2d, TextureError>,
    ) -> Result<Rc<Texture2d>, TextureError> {
        if let Some(texture) = self.textures.get(key) {
            return Ok(Rc::clone(texture));
        }
        let texture = Rc::new(create()?);
        self.textures.insert(key.to_string(), Rc::clone(&texture));
        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};

    #[test]
    fn same_key_shares_one_texture() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let mut cache = TextureCache::new();

        let a = cache.get_or_try_insert("wood.png", || Texture2d::solid(&gl, [1, 1, 1, 255])).unwrap();
        let b = cache.get_or_try_insert("wood.png", || Texture2d::solid(&gl, [2, 2, 2, 255])).unwrap();

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::CreateTexture(_))), 1);
    }

    #[test]
    fn failed_creation_is_not_cached() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let mut cache = TextureCache::new();

        let err = cache.get_or_try_insert("bad", || Err(TextureError::Create("no".into())));
        assert!(err.is_err());
        assert!(cache.is_empty());

        assert!(cache.get_or_try_insert("bad", || Texture2d::solid(&gl, [0; 4])).is_ok());
    }
}
