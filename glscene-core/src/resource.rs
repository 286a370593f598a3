/// Named resource descriptors and the registry a scene downloads at start
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A decoded image supplied by the host's transport.
pub trait DecodedImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Access to the host's concrete image type.
    fn as_any(&self) -> &dyn Any;
}

pub type ImageHandle = Rc<dyn DecodedImage>;

/// How a resource is fetched, decided from its URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Binary,
}

impl ResourceKind {
    pub fn from_uri(uri: &str) -> Self {
        if uri.contains(".jpg") || uri.contains(".png") {
            ResourceKind::Image
        } else {
            ResourceKind::Binary
        }
    }
}

/// The slot a descriptor's download lands in.
#[derive(Clone, Default)]
pub enum ResourcePayload {
    #[default]
    Pending,
    Data(Vec<u8>),
    Image(ImageHandle),
    Failed,
}

impl ResourcePayload {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ResourcePayload::Data(_) | ResourcePayload::Image(_))
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            ResourcePayload::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.data().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            ResourcePayload::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl fmt::Debug for ResourcePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourcePayload::Pending => f.write_str("Pending"),
            ResourcePayload::Data(bytes) => write!(f, "Data({} bytes)", bytes.len()),
            ResourcePayload::Image(image) => {
                write!(f, "Image({}x{})", image.width(), image.height())
            }
            ResourcePayload::Failed => f.write_str("Failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub name: String,
    pub uri: String,
    pub payload: ResourcePayload,
}

impl ResourceDescriptor {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            payload: ResourcePayload::Pending,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from_uri(&self.uri)
    }
}

/// Ordered collection of descriptors.
///
/// Names are not required to be unique; lookups return the first match in
/// insertion order. Registries hold tens of entries, so lookup is a scan.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    items: Vec<ResourceDescriptor>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: ResourceDescriptor) {
        self.items.push(descriptor);
    }

    pub fn find(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut ResourceDescriptor> {
        self.items.iter_mut().find(|item| item.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&ResourceDescriptor> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ResourceDescriptor> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.items.iter().filter(|item| item.payload.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.payload, ResourcePayload::Failed))
            .count()
    }
}

impl<'a> IntoIterator for &'a ResourceRegistry {
    type Item = &'a ResourceDescriptor;
    type IntoIter = std::slice::Iter<'a, ResourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut registry = ResourceRegistry::new();
        registry.add(ResourceDescriptor::new("shader", "first.glsl"));
        registry.add(ResourceDescriptor::new("shader", "second.glsl"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("shader").unwrap().uri, "first.glsl");
    }

    #[test]
    fn test_find_missing_is_none() {
        let mut registry = ResourceRegistry::new();
        registry.add(ResourceDescriptor::new("mesh", "mesh.bin"));
        assert!(registry.find("texture").is_none());
        assert!(ResourceRegistry::new().find("mesh").is_none());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut registry = ResourceRegistry::new();
        for name in ["c", "a", "b"] {
            registry.add(ResourceDescriptor::new(name, format!("{name}.txt")));
        }
        let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_kind_from_uri() {
        assert_eq!(ResourceKind::from_uri("tex/wood.png"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_uri("photo.jpg?v=2"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_uri("shader.vs"), ResourceKind::Binary);
        assert_eq!(ResourceKind::from_uri("model.jpeg"), ResourceKind::Binary);
    }

    #[test]
    fn test_payload_counts() {
        let mut registry = ResourceRegistry::new();
        registry.add(ResourceDescriptor::new("a", "a.txt"));
        registry.add(ResourceDescriptor::new("b", "b.txt"));
        registry.add(ResourceDescriptor::new("c", "c.txt"));

        registry.get_mut(0).unwrap().payload = ResourcePayload::Data(b"hello".to_vec());
        registry.find_mut("b").unwrap().payload = ResourcePayload::Failed;

        assert_eq!(registry.loaded_count(), 1);
        assert_eq!(registry.failed_count(), 1);
        assert_eq!(registry.find("a").unwrap().payload.text(), Some("hello"));
        assert!(matches!(registry.find("c").unwrap().payload, ResourcePayload::Pending));
    }
}
