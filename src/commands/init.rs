//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Blog
description: ''
author: Anonymous
# email: you@example.com
language: en

# URL
url: http://localhost:8080

# Directory
posts_dir: content/posts
public_dir: public
template_dir: templates

# Writing
excerpt_length: 200
words_per_minute: 200

# Feed
feed_limit: 20
"#;

/// Initialize a new site in the given directory. Existing files are kept.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let posts_dir = target_dir.join("content/posts");
    fs::create_dir_all(&posts_dir)?;
    fs::create_dir_all(target_dir.join("templates"))?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    let sample_path = posts_dir.join("hello-world.md");
    if !sample_path.exists() {
        let today = chrono::Local::now().format("%Y-%m-%d");
        let sample_post = format!(
            r#"---
title: Hello World
date: {}
description: The first post on this blog
tags: ["meta"]
---

Welcome! This post lives in `content/posts/hello-world.md`.

## Writing posts

Every post starts with a front-matter block holding `title`, `date` and
`description`. Create one with:

```bash
$ folio new "My New Post"
```

## Building the site

```bash
$ folio generate
```
"#,
            today
        );
        fs::write(&sample_path, sample_post)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = tempfile::TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.config.title, "My Blog");

        let report = folio.load_posts().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.posts[0].slug, "hello-world");
        assert_eq!(report.posts[0].tags, vec!["meta"]);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            "title: Mine\n"
        );
    }
}
