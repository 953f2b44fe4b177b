//! Loading service instances from disk.

use std::path::Path;

use anyhow::Context;
use brig_core::ServiceInstance;

/// Read a service instance from a JSON or YAML file.
///
/// Files ending in `.json` are parsed as JSON; anything else as YAML.
pub fn load(path: &Path) -> anyhow::Result<ServiceInstance> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading instance file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let instance = if is_json {
        serde_json::from_str(&raw).with_context(|| format!("parsing {} as JSON", path.display()))?
    } else {
        serde_yaml::from_str(&raw).with_context(|| format!("parsing {} as YAML", path.display()))?
    };
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn yaml_instance() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r"
spec:
  id: 550e8400-e29b-41d4-a716-446655440000
  fqName: dh-mysql-apb
  image: docker.io/example/mysql-apb:latest
context:
  platform: kubernetes
  namespace: db
parameters:
  db_name: orders
"
        )
        .unwrap();

        let instance = load(file.path()).unwrap();
        assert_eq!(instance.spec.fq_name, "dh-mysql-apb");
        assert_eq!(instance.namespace(), "db");
        assert_eq!(
            instance.parameters.get("db_name"),
            Some(&serde_json::json!("orders"))
        );
    }

    #[test]
    fn json_instance() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"spec":{{"id":"550e8400-e29b-41d4-a716-446655440000","fq_name":"x","image":"y"}},
               "context":{{"platform":"kubernetes","namespace":"db"}}}}"#
        )
        .unwrap();
        assert_eq!(load(file.path()).unwrap().spec.image, "y");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/instance.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/instance.yaml"));
    }
}
