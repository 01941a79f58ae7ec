//! HTML template for the release notes page.

/// Tera template rendered from [`super::Page`]. Sections use native
/// `<details>` elements, so each header toggles its own section and nothing
/// is remembered across reloads.
pub const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; color: #1f2328; }
  .loading[hidden], .error[hidden] { display: none; }
  .error { border: 1px solid #cf222e; background: #ffebe9; padding: 1rem; border-radius: 6px; }
  .version-section { border: 1px solid #d0d7de; border-radius: 6px; margin-bottom: 1rem; }
  .version-header { cursor: pointer; padding: 0.75rem 1rem; font-weight: 600; display: flex; justify-content: space-between; }
  .version-meta { font-weight: 400; color: #59636e; }
  .developer { padding: 0 1rem 0.5rem; }
  .developer h3 { font-size: 1rem; margin: 0.75rem 0 0.25rem; }
  .count { font-weight: 400; color: #59636e; font-size: 0.875rem; }
  .commit { list-style: none; margin: 0.25rem 0; display: flex; gap: 0.5rem; align-items: baseline; }
  .commit time { margin-left: auto; color: #59636e; font-size: 0.75rem; white-space: nowrap; }
  .tag { font-size: 0.75rem; padding: 0 0.4rem; border-radius: 999px; background: #eaeef2; text-transform: uppercase; }
  .tag-feat { background: #dafbe1; }
  .tag-fix { background: #fff8c5; }
  .tag-breaking { background: #ffebe9; color: #cf222e; }
  .tag-perf { background: #ddf4ff; }
  .tag-docs { background: #fbefff; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<div id="loading" class="loading" hidden>Loading release notes...</div>
{% if error %}
<div id="error" class="error">
  <p><strong>Unable to load release notes.</strong></p>
  <p>{{ error }}</p>
</div>
{% else %}
<main id="content">
{% if is_empty %}
  <p class="empty">No release notes yet.</p>
{% endif %}
{% for section in sections %}
  <details class="version-section" data-version="{{ section.key }}"{% if section.expanded %} open{% endif %}>
    <summary class="version-header">
      <span class="version-key">v{{ section.key }}</span>
      <span class="version-meta">{{ section.developers | length }} developer{% if section.developers | length != 1 %}s{% endif %}, {{ section.commit_count }} commit{% if section.commit_count != 1 %}s{% endif %}</span>
    </summary>
    {% for developer in section.developers %}
    <section class="developer">
      <h3>{{ developer.name }} <span class="count">{{ developer.commit_count }} commit{% if developer.commit_count != 1 %}s{% endif %}</span></h3>
      <ul>
        {% for entry in developer.entries %}
        <li class="commit">
          <span class="tag tag-{{ entry.tag }}">{{ entry.tag }}</span>
          <span class="message">{{ entry.message }}</span>
          <time datetime="{{ entry.date }}">{{ entry.day }}</time>
        </li>
        {% endfor %}
      </ul>
    </section>
    {% endfor %}
  </details>
{% endfor %}
</main>
{% endif %}
</body>
</html>
"#;
