use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::models::GeoPoint;

pub const ROUTE_FILE_NAME: &str = "route.json";

#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    #[error("failed to access route file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid route file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no route saved at {0}")]
    NotFound(PathBuf),
    #[error("route file task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Reads the flat `[{"lat": .., "lng": ..}, ..]` array.
pub fn from_reader(reader: impl Read) -> Result<Vec<GeoPoint>, RouteFileError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

pub fn to_writer(route: &[GeoPoint], writer: impl Write) -> Result<(), RouteFileError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, route)?;
    writer.flush()?;
    Ok(())
}

pub fn read_route(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>, RouteFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => RouteFileError::NotFound(path.to_path_buf()),
        _ => RouteFileError::Io(err),
    })?;
    from_reader(file)
}

/// Writes through a sibling temp file so readers never observe a partial route.
pub fn write_route(path: impl AsRef<Path>, route: &[GeoPoint]) -> Result<(), RouteFileError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    to_writer(route, File::create(&tmp_path)?)?;
    fs::rename(&tmp_path, path)?;

    tracing::debug!("wrote {} points to {}", route.len(), path.display());
    Ok(())
}

/// Owns the location of the last generated route for the HTTP server.
pub struct RouteStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl RouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The write lock travels with the blocking write, so dropping this
    /// future does not let another save start before the file is in place.
    pub async fn save(&self, route: Vec<GeoPoint>) -> Result<(), RouteFileError> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            write_route(path, &route)
        })
        .await?
    }

    pub async fn load(&self) -> Result<Vec<GeoPoint>, RouteFileError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_route(path)).await?
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_wire_format_uses_lat_lng_objects() {
        let mut buffer = Vec::new();
        to_writer(&[GeoPoint::new(35.5, 139.25)], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            r#"[{"lat":35.5,"lng":139.25}]"#
        );
    }

    #[test]
    fn test_reader_round_trip_is_exact() {
        let route = vec![
            GeoPoint::new(35.383050583900670, 139.27263622165583),
            GeoPoint::new(-0.1 + 0.2, 1.0 / 3.0),
            GeoPoint::new(f64::MIN_POSITIVE, -179.99999999999997),
        ];
        let mut buffer = Vec::new();
        to_writer(&route, &mut buffer).unwrap();
        let decoded = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(decoded.len(), route.len());
        for (a, b) in decoded.iter().zip(&route) {
            assert_eq!(a.lat.to_bits(), b.lat.to_bits());
            assert_eq!(a.lng.to_bits(), b.lng.to_bits());
        }
    }

    #[test]
    fn test_reader_rejects_missing_field() {
        let err = from_reader(r#"[{"lat":1.0,"lng":2.0},{"lat":3.0}]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, RouteFileError::Json(_)));
    }

    #[test]
    fn test_reader_accepts_reordered_fields() {
        let route = from_reader(r#"[{"lng":2.0,"lat":1.0}]"#.as_bytes()).unwrap();
        assert_eq!(route, vec![GeoPoint::new(1.0, 2.0)]);
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_route(dir.path().join(ROUTE_FILE_NAME)).unwrap_err();
        assert!(matches!(err, RouteFileError::NotFound(_)));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data").join(ROUTE_FILE_NAME);
        let route = vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)];

        write_route(&path, &route).unwrap();
        assert_eq!(read_route(&path).unwrap(), route);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RouteStore::new(dir.path().join(ROUTE_FILE_NAME));
        assert!(matches!(store.load().await, Err(RouteFileError::NotFound(_))));

        let route = vec![GeoPoint::new(10.0, 20.0), GeoPoint::new(10.5, 20.5)];
        store.save(route.clone()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), route);

        // A second save replaces the first.
        store.save(vec![GeoPoint::new(0.0, 0.0)]).await.unwrap();
        assert_eq!(store.load().await.unwrap(), vec![GeoPoint::new(0.0, 0.0)]);
    }

    #[tokio::test]
    async fn test_abandoned_saves_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RouteStore::new(dir.path().join(ROUTE_FILE_NAME)));
        let routes: Vec<Vec<GeoPoint>> = (0..8)
            .map(|i| {
                (0..20_000)
                    .map(|j| GeoPoint::new(i as f64, j as f64 * 1e-4))
                    .collect()
            })
            .collect();

        let mut tasks = Vec::new();
        for (i, route) in routes.iter().cloned().enumerate() {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    // Dropped after its first poll, as when a client disconnects.
                    let _ = tokio::time::timeout(Duration::ZERO, store.save(route)).await;
                } else {
                    store.save(route).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // Waits for any write still running on the blocking pool.
        drop(Arc::clone(&store.write_lock).lock_owned().await);

        let saved = store.load().await.unwrap();
        assert!(routes.contains(&saved));
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
