use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;




// ============================================================================
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("override '{0}' is not of the form key.path=value")]
    MalformedOverride(String),

    #[error("no configuration item at '{0}'")]
    UnknownKey(String),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}




// ============================================================================
fn descend<'a>(node: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match node {
        Value::Mapping(mapping) => mapping.get_mut(&Value::String(key.to_string())),
        _ => None,
    }
}




/**
 * Apply a command-line override of the form `key.path=value` to any
 * serializable value: the target is lowered to a YAML tree, the dotted path
 * is walked to an existing node, the node is replaced with the parsed value,
 * and the target is rebuilt from the tree. Paths that do not name an
 * existing item are rejected rather than inserted.
 */
pub fn patch_key_val<T>(target: &mut T, override_str: &str) -> Result<(), Error>
where
    T: Serialize + DeserializeOwned
{
    let (path, value_str) = override_str
        .split_once('=')
        .ok_or_else(|| Error::MalformedOverride(override_str.to_string()))?;

    let mut tree = serde_yaml::to_value(&*target)?;
    let mut node = &mut tree;

    for key in path.split('.') {
        node = descend(node, key).ok_or_else(|| Error::UnknownKey(path.to_string()))?;
    }
    *node = serde_yaml::from_str(value_str)?;
    *target = serde_yaml::from_value(tree)?;
    Ok(())
}




// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    struct Inner {
        x: f64,
        y: usize,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    struct Outer {
        inner: Inner,
        name: String,
    }

    fn example() -> Outer {
        Outer {
            inner: Inner { x: 32.0, y: 512 },
            name: "example".to_string(),
        }
    }

    #[test]
    fn can_override_a_nested_item() {
        let mut outer = example();
        patch_key_val(&mut outer, "inner.y=1024").unwrap();
        assert!(outer.inner.x == 32.0);
        assert!(outer.inner.y == 1024);
    }

    #[test]
    fn rejects_paths_that_do_not_exist() {
        let mut outer = example();
        assert!(matches!(patch_key_val(&mut outer, "inner.z=1.0"), Err(Error::UnknownKey(_))));
    }

    #[test]
    fn rejects_overrides_without_an_equals_sign() {
        let mut outer = example();
        assert!(matches!(patch_key_val(&mut outer, "inner.y"), Err(Error::MalformedOverride(_))));
    }
}
