//! Local export service: generates a Vite project for a stored project and
//! returns it as a base64 tar payload.

use crate::archive::pack;
use crate::store::MemoryProjectStore;
use async_trait::async_trait;
use pagecraft_common::slugify;
use pagecraft_compiler_react::{
    compile_app, component_names, generate_page_or_fallback, page_module_path, scaffold_files,
    ReactGenerator,
};
use pagecraft_editor::{
    Credential, Document, ExportError, ExportPayload, ExportService, PageGenerator, PageRequest,
    Project, ProjectId,
};
use std::sync::Arc;

/// Archive name for a project called `name`
pub fn archive_name(name: &str) -> String {
    let slug = slugify(name);
    let slug = if slug.is_empty() { "project".to_string() } else { slug };
    format!("{}_project.tar", slug)
}

/// Every file of the generated project, scaffold first
///
/// Internal links are resolved against the project's own pages; a page whose
/// generation fails gets the fallback component instead.
pub fn project_files(project: &Project, generator: &dyn PageGenerator) -> Vec<(String, String)> {
    let document = Document::from_project(project.clone());
    let routes = document.route_map();
    let pages = document.pages();

    let mut files = scaffold_files(&document.name);
    for (page, component) in pages.iter().zip(component_names(pages)) {
        let request = PageRequest {
            page,
            theme: &document.theme,
            routes: &routes,
        };
        files.push((page_module_path(&component), generate_page_or_fallback(generator, &request)));
    }
    files.push(("src/App.jsx".to_string(), compile_app(pages)));
    files
}

pub struct LocalExporter {
    store: Arc<MemoryProjectStore>,
    generator: Arc<dyn PageGenerator>,
}

impl LocalExporter {
    /// Exporter using the built-in React generator
    pub fn new(store: Arc<MemoryProjectStore>) -> Self {
        Self::with_generator(store, Arc::new(ReactGenerator::default()))
    }

    pub fn with_generator(store: Arc<MemoryProjectStore>, generator: Arc<dyn PageGenerator>) -> Self {
        Self { store, generator }
    }
}

#[async_trait]
impl ExportService for LocalExporter {
    async fn request_export(
        &self,
        id: &ProjectId,
        credential: Option<&Credential>,
    ) -> Result<ExportPayload, ExportError> {
        let project = self.store.get(id, credential)?;
        let files = project_files(&project, self.generator.as_ref());
        let bytes = pack(&files)?;
        let filename = archive_name(&project.name);

        tracing::info!(
            "[Export] packed {} ({} files, {} bytes)",
            filename,
            files.len(),
            bytes.len()
        );
        Ok(ExportPayload::encode(filename, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokens;
    use pagecraft_common::IdGenerator;
    use pagecraft_editor::{EditorSession, GenerateError, LinkRef, PageId, StoreError};
    use pagecraft_registry::SectionType;
    use std::io::Read;

    fn store() -> Arc<MemoryProjectStore> {
        let tokens = StaticTokens::new().with("t-alice", "alice");
        Arc::new(MemoryProjectStore::with_ids(
            Arc::new(tokens),
            IdGenerator::with_clock(|| 1_700_000_000_000),
        ))
    }

    fn alice() -> Credential {
        Credential::bearer("t-alice")
    }

    /// Home page whose hero links to an "About Us" page
    fn saved_site(store: &MemoryProjectStore) -> ProjectId {
        let mut session = EditorSession::new(Document::new("My Site"));
        let about = session.add_page().unwrap();
        session.rename_page(&about, "About Us");
        session.switch_page(&PageId::new("home"));
        let hero = session.add_element(SectionType::Hero).unwrap();
        session.set_element_field(&hero, "buttonHref", LinkRef::internal(about).to_value());
        let snapshot = session.prepare_save();
        store.create(&snapshot, false, Some(&alice())).unwrap().id.unwrap()
    }

    fn unpack(payload: &ExportPayload) -> Vec<(String, String)> {
        let archive = payload.decode().unwrap();
        let mut tar = tar::Archive::new(&archive.bytes[..]);
        tar.entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let path = entry.path().unwrap().to_string_lossy().to_string();
                let mut contents = String::new();
                entry.read_to_string(&mut contents).unwrap();
                (path, contents)
            })
            .collect()
    }

    fn file<'a>(files: &'a [(String, String)], path: &str) -> &'a str {
        &files.iter().find(|(p, _)| p == path).unwrap().1
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("My Site"), "my-site_project.tar");
        assert_eq!(archive_name(""), "project_project.tar");
    }

    #[tokio::test]
    async fn test_export_packs_pages_router_and_scaffold() {
        let store = store();
        let id = saved_site(&store);
        let exporter = LocalExporter::new(store.clone());

        let payload = exporter.request_export(&id, Some(&alice())).await.unwrap();
        assert_eq!(payload.filename, "my-site_project.tar");

        let files = unpack(&payload);
        let home = file(&files, "src/pages/Home.jsx");
        assert!(home.contains("<Link to=\"/about-us\""));
        assert!(file(&files, "src/pages/AboutUs.jsx").contains("export default function AboutUs()"));
        assert!(file(&files, "src/App.jsx").contains("<Route path=\"/about-us\" element={<AboutUs />} />"));
        assert!(file(&files, "package.json").contains("\"name\": \"my-site\""));
    }

    struct Unavailable;

    impl PageGenerator for Unavailable {
        fn generate_page(&self, _request: &PageRequest<'_>) -> Result<String, GenerateError> {
            Err(GenerateError("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_generation_failure_still_exports() {
        let store = store();
        let id = saved_site(&store);
        let exporter = LocalExporter::with_generator(store.clone(), Arc::new(Unavailable));

        let payload = exporter.request_export(&id, Some(&alice())).await.unwrap();
        let files = unpack(&payload);
        assert!(file(&files, "src/pages/Home.jsx").contains("Using fallback template."));
        assert!(file(&files, "src/App.jsx").contains("import Home from \"./pages/Home.jsx\";"));
    }

    #[tokio::test]
    async fn test_export_requires_access() {
        let store = store();
        let id = saved_site(&store);
        let exporter = LocalExporter::new(store);

        assert_eq!(
            exporter.request_export(&id, None).await,
            Err(ExportError::Store(StoreError::Forbidden))
        );
        assert_eq!(
            exporter.request_export(&ProjectId::new("missing"), Some(&alice())).await,
            Err(ExportError::Store(StoreError::NotFound))
        );
    }
}
