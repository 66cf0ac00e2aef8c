use anyhow::{anyhow, Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::{ImageData, ImagesConfig};
use crate::core::request::MovieDb;

/// Thor: The Dark World (2013)
pub const DEMO_MOVIE_ID: i64 = 76338;
pub const IMAGES_PER_KIND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Backdrop,
    Poster,
    Logo,
}

impl ImageKind {
    pub const ALL: [ImageKind; 3] = [ImageKind::Backdrop, ImageKind::Poster, ImageKind::Logo];

    pub fn plural(&self) -> &'static str {
        match self {
            ImageKind::Backdrop => "Backdrops",
            ImageKind::Poster => "Posters",
            ImageKind::Logo => "Logos",
        }
    }

    pub fn sizes<'a>(&self, config: &'a ImagesConfig) -> &'a [String] {
        match self {
            ImageKind::Backdrop => &config.backdrop_sizes,
            ImageKind::Poster => &config.poster_sizes,
            ImageKind::Logo => &config.logo_sizes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovieImages {
    pub title: String,
    pub backdrops: Vec<ImageData>,
    pub posters: Vec<ImageData>,
    pub logos: Vec<ImageData>,
}

impl MovieImages {
    pub fn of_kind(&self, kind: ImageKind) -> &[ImageData] {
        match kind {
            ImageKind::Backdrop => &self.backdrops,
            ImageKind::Poster => &self.posters,
            ImageKind::Logo => &self.logos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub image: ImageData,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Download {
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

pub fn load_images<C: MovieDb + ?Sized>(client: &C, movie_id: i64) -> Result<MovieImages> {
    let movie = client.get_movie_with_images(movie_id)?;
    let images = movie.images.unwrap_or_default();
    let take = |list: Vec<ImageData>| list.into_iter().take(IMAGES_PER_KIND).collect::<Vec<_>>();
    let loaded = MovieImages {
        title: movie.title,
        backdrops: take(images.backdrops),
        posters: take(images.posters),
        logos: take(images.logos),
    };
    info!(
        "load_images: '{}' has {} backdrops, {} posters, {} logos",
        loaded.title,
        loaded.backdrops.len(),
        loaded.posters.len(),
        loaded.logos.len()
    );
    Ok(loaded)
}

/// Every address at which each image is offered, one per configured size.
pub fn resolve_urls(
    config: &ImagesConfig,
    kind: ImageKind,
    images: &[ImageData],
) -> Vec<ResolvedImage> {
    let sizes = kind.sizes(config);
    images
        .iter()
        .map(|image| ResolvedImage {
            image: image.clone(),
            urls: sizes
                .iter()
                .map(|size| config.image_url(size, &image.file_path))
                .collect(),
        })
        .collect()
}

pub fn format_resolved(resolved: &[ResolvedImage]) -> String {
    let mut text = String::new();
    for entry in resolved {
        for url in &entry.urls {
            text.push_str(&format!("\t -> {}\n", url));
        }
    }
    for entry in resolved {
        text.push_str(&format!(
            "{}\t {}x{}\n",
            entry.image.file_path, entry.image.width, entry.image.height
        ));
    }
    text
}

/// Local name for a remote image path: its last component only.
pub fn local_file_name(file_path: &str) -> Result<PathBuf> {
    Path::new(file_path.trim_start_matches('/'))
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("image path {:?} has no file name", file_path))
}

/// Fetches the first backdrop at the first backdrop size into `target_dir`,
/// overwriting any file of the same name.
pub fn download_first<C: MovieDb + ?Sized>(
    client: &C,
    config: &ImagesConfig,
    images: &MovieImages,
    target_dir: &Path,
) -> Result<Download> {
    let image = images
        .backdrops
        .first()
        .ok_or_else(|| anyhow!("'{}' has no backdrop to download", images.title))?;
    let size = config
        .backdrop_sizes
        .first()
        .ok_or_else(|| anyhow!("configuration lists no backdrop sizes"))?;

    let path = target_dir.join(local_file_name(&image.file_path)?);
    let url = config.image_url(size, &image.file_path);
    let bytes = client.get_image_bytes(&url)?;
    fs::write(&path, &bytes).context("exception while trying to write the picture to local disk")?;
    info!("download_first: wrote {} bytes to {:?}", bytes.len(), path);

    Ok(Download {
        url,
        path,
        bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{image, sample_config, FakeMovieDb};

    #[test]
    fn truncates_each_kind_to_three() {
        let fake = FakeMovieDb::default();
        let images = load_images(&fake, DEMO_MOVIE_ID).unwrap();
        assert_eq!(images.title, "Thor: The Dark World");
        assert_eq!(images.backdrops.len(), 3);
        assert_eq!(images.backdrops[2].file_path, "/b3.jpg");
        assert_eq!(images.posters.len(), 1);
        assert!(images.logos.is_empty());
    }

    #[test]
    fn movie_without_images_loads_empty() {
        let mut fake = FakeMovieDb::default();
        fake.movie.images = None;
        let images = load_images(&fake, DEMO_MOVIE_ID).unwrap();
        assert!(images.of_kind(ImageKind::Backdrop).is_empty());
    }

    #[test]
    fn resolves_one_url_per_size() {
        let config = sample_config();
        let resolved = resolve_urls(&config.images, ImageKind::Poster, &[image("/p1.jpg")]);
        assert_eq!(
            resolved[0].urls,
            vec![
                "https://image.tmdb.org/t/p/w92/p1.jpg",
                "https://image.tmdb.org/t/p/w500/p1.jpg",
                "https://image.tmdb.org/t/p/original/p1.jpg",
            ]
        );
        let text = format_resolved(&resolved);
        assert!(text.contains("\t -> https://image.tmdb.org/t/p/w500/p1.jpg\n"));
        assert!(text.ends_with("/p1.jpg\t 1920x1080\n"));
    }

    #[test]
    fn local_name_is_the_remote_basename() {
        assert_eq!(local_file_name("/abc.jpg").unwrap(), PathBuf::from("abc.jpg"));
        assert_eq!(local_file_name("abc.jpg").unwrap(), PathBuf::from("abc.jpg"));
        assert_eq!(local_file_name("/a/b.jpg").unwrap(), PathBuf::from("b.jpg"));
        assert_eq!(local_file_name("/../x.jpg").unwrap(), PathBuf::from("x.jpg"));
        for bad in ["", "/", "..", "/a/.."] {
            assert!(local_file_name(bad).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn download_stays_inside_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");
        fs::create_dir(&target).unwrap();
        let fake = FakeMovieDb::default();
        let images = MovieImages {
            title: "Escape".to_string(),
            backdrops: vec![image("/../escaped.jpg")],
            ..Default::default()
        };

        let download = download_first(&fake, &sample_config().images, &images, &target).unwrap();
        assert_eq!(download.path, target.join("escaped.jpg"));
        assert!(target.join("escaped.jpg").is_file());
        assert!(!dir.path().join("escaped.jpg").exists());
    }

    #[test]
    fn nameless_image_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeMovieDb::default();
        let images = MovieImages {
            title: "Nameless".to_string(),
            backdrops: vec![image("/")],
            ..Default::default()
        };
        let err = download_first(&fake, &sample_config().images, &images, dir.path()).unwrap_err();
        assert!(err.to_string().contains("has no file name"));
        assert!(fake.downloaded_urls.borrow().is_empty());
    }

    #[test]
    fn downloads_first_backdrop_at_first_size() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeMovieDb::default();
        let config = sample_config();
        let images = load_images(&fake, DEMO_MOVIE_ID).unwrap();

        let download = download_first(&fake, &config.images, &images, dir.path()).unwrap();
        assert_eq!(download.url, "https://image.tmdb.org/t/p/w300/b1.jpg");
        assert_eq!(download.path, dir.path().join("b1.jpg"));
        assert_eq!(download.bytes, fake.image_bytes.len());
        assert_eq!(fs::read(&download.path).unwrap(), fake.image_bytes);
        assert_eq!(fake.downloaded_urls.borrow().len(), 1);
    }

    #[test]
    fn write_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let fake = FakeMovieDb::default();
        let config = sample_config();
        let images = load_images(&fake, DEMO_MOVIE_ID).unwrap();

        let err = download_first(&fake, &config.images, &images, &missing).unwrap_err();
        assert!(format!("{:#}", err)
            .starts_with("exception while trying to write the picture to local disk: "));
    }

    #[test]
    fn no_backdrop_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeMovieDb::default();
        let images = MovieImages {
            title: "Empty".to_string(),
            ..Default::default()
        };
        let err = download_first(&fake, &sample_config().images, &images, dir.path()).unwrap_err();
        assert!(err.to_string().contains("no backdrop"));
        assert!(fake.downloaded_urls.borrow().is_empty());
    }
}
