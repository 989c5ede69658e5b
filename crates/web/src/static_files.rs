//! Serving files from a directory.
//!
//! A mount maps every `GET` under `resource` to the file at the same relative path below
//! `root`. The resolved path is canonicalized and must stay inside the canonicalized
//! root, so `..` segments and absolute components cannot escape it. Every failure
//! (outside the root, missing, unreadable, a directory) is answered with 404 carrying
//! only the requested resource.

use crate::handler::RequestHandler;
use crate::{HandlerError, PathParams, ProtocolError};
use async_trait::async_trait;
use bytes::Bytes;
use lean_http::protocol::Request;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    resource: String,
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(resource: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self { resource: resource.into(), root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the file behind `resource`, or explains on the debug log why it can't.
    async fn read(&self, resource: &str) -> Option<Bytes> {
        // +1 to drop the separating '/'
        let sub_path = resource.get(self.resource.len() + 1..)?;

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|e| debug!(root = %self.root.display(), cause = %e, "can't resolve static root"))
            .ok()?;

        let file_path = fs::canonicalize(root.join(sub_path))
            .await
            .map_err(|e| debug!(resource, cause = %e, "can't resolve static file"))
            .ok()?;

        if !file_path.starts_with(&root) {
            debug!(resource, resolved = %file_path.display(), "static path escapes root");
            return None;
        }

        fs::read(&file_path)
            .await
            .map(Bytes::from)
            .map_err(|e| debug!(resource, cause = %e, "can't read static file"))
            .ok()
    }
}

#[async_trait]
impl RequestHandler for StaticFiles {
    async fn invoke(&self, request: Request, _params: PathParams) -> Result<Bytes, HandlerError> {
        match self.read(request.resource()).await {
            Some(content) => Ok(content),
            None => Err(ProtocolError::not_found(request.resource()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method, StatusCode};
    use lean_http::protocol::{Query, RequestHead};
    use std::fs as std_fs;
    use tempfile::TempDir;

    struct Fixture {
        // keeps the directories alive
        _dir: TempDir,
        public: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std_fs::create_dir_all(public.join("css")).unwrap();
        std_fs::write(public.join("index.html"), "<h1>hi</h1>").unwrap();
        std_fs::write(public.join("css").join("app.css"), "body {}").unwrap();
        std_fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
        Fixture { _dir: dir, public }
    }

    async fn get(files: &StaticFiles, path: &str) -> Result<Bytes, HandlerError> {
        let request = RequestHead::new(Method::GET, path, Query::default(), HeaderMap::new()).body(Bytes::new());
        files.invoke(request, PathParams::empty()).await
    }

    fn assert_not_found(result: Result<Bytes, HandlerError>, resource: &str) {
        match result {
            Err(HandlerError::Abort(error)) => {
                assert_eq!(error.code(), StatusCode::NOT_FOUND);
                assert_eq!(error.data(), Some(resource));
            }
            other => panic!("expected 404, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn serves_files_below_root() {
        let fixture = fixture();
        let files = StaticFiles::new("/static", &fixture.public);

        assert_eq!(get(&files, "/static/index.html").await.unwrap(), "<h1>hi</h1>");
        assert_eq!(get(&files, "/static/css/app.css").await.unwrap(), "body {}");
    }

    #[tokio::test]
    async fn dot_dot_cannot_escape_root() {
        let fixture = fixture();
        let files = StaticFiles::new("/static", &fixture.public);

        assert_not_found(get(&files, "/static/../secret.txt").await, "/static/../secret.txt");
        assert_not_found(get(&files, "/static/../../etc/passwd").await, "/static/../../etc/passwd");
        assert_not_found(get(&files, "/static/css/../../secret.txt").await, "/static/css/../../secret.txt");
    }

    #[tokio::test]
    async fn dot_dot_inside_root_is_fine() {
        let fixture = fixture();
        let files = StaticFiles::new("/static", &fixture.public);

        assert_eq!(get(&files, "/static/css/../index.html").await.unwrap(), "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn absolute_sub_path_cannot_escape_root() {
        let fixture = fixture();
        let files = StaticFiles::new("/static", &fixture.public);
        let secret = fixture.public.parent().unwrap().join("secret.txt");
        let path = format!("/static/{}", secret.display());

        assert_not_found(get(&files, &path).await, &path);
    }

    #[tokio::test]
    async fn missing_file_and_directory() {
        let fixture = fixture();
        let files = StaticFiles::new("/static", &fixture.public);

        assert_not_found(get(&files, "/static/nope.html").await, "/static/nope.html");
        assert_not_found(get(&files, "/static/css").await, "/static/css");
    }

    #[tokio::test]
    async fn missing_root() {
        let files = StaticFiles::new("/static", "/definitely/not/a/real/root");

        assert_not_found(get(&files, "/static/index.html").await, "/static/index.html");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_out_of_root() {
        let fixture = fixture();
        let secret = fixture.public.parent().unwrap().join("secret.txt");
        std::os::unix::fs::symlink(&secret, fixture.public.join("link.txt")).unwrap();
        let files = StaticFiles::new("/static", &fixture.public);

        assert_not_found(get(&files, "/static/link.txt").await, "/static/link.txt");
    }
}
