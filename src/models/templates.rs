pub const DEFAULT_TEMPLATE_CATEGORY: &str = "Popular";
pub const DEFAULT_TEMPLATE: &str = "slice";

pub static TEMPLATE_CATALOGUE: [(&str, [&str; 10]); 4] = [
	(
		"Popular",
		[
			"slice", "circuit", "droplet", "littlechild", "abstract", "paperplane", "facet", "wood",
			"lon", "aesthetic",
		],
	),
	(
		"Classic",
		[
			"dim", "medison", "berlin", "savon", "ugolki", "medic", "damask", "emblema", "nature",
			"vid",
		],
	),
	(
		"Education",
		[
			"dark", "pentogram", "blueprint", "analyze", "ribbon", "pencils", "green", "reflection",
			"digital", "cosmic",
		],
	),
	(
		"Modern",
		[
			"dividend", "pretty", "sitdolor", "kids", "stairs", "white", "shell", "digitalocean",
			"book", "draw",
		],
	),
];

pub fn templates_in(category: &str) -> Option<&'static [&'static str]> {
	TEMPLATE_CATALOGUE
		.iter()
		.find(|(name, _)| *name == category)
		.map(|(_, templates)| templates.as_slice())
}

/// Имя шаблона для `create_file`: `категория/шаблон`.
pub fn template_path(category: &str, template: &str) -> String {
	format!("{}/{}", category.to_lowercase(), template)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_and_path() {
		assert_eq!(templates_in("Classic").map(|t| t[0]), Some("dim"));
		assert!(templates_in("Retro").is_none());
		assert_eq!(template_path("Education", "blueprint"), "education/blueprint");
	}
}
