use std::fmt;

use serde::Serialize;

use crate::annotation::AnnotationMap;

/// Prefix that marks a cell value as an Ensembl gene identifier.
pub const GENE_ID_PREFIX: &str = "ENSG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationSource {
    Ensembl,
    Hgnc,
    Gencode,
}

impl AnnotationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationSource::Ensembl => "ensembl",
            AnnotationSource::Hgnc => "hgnc",
            AnnotationSource::Gencode => "gencode",
        }
    }
}

impl fmt::Display for AnnotationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub name: &'a str,
    pub source: AnnotationSource,
}

/// Looks up gene names across the three reference tables in a fixed
/// priority order: ensembl, then hgnc, then gencode. First hit wins.
#[derive(Debug, Clone, Default)]
pub struct GeneResolver {
    ensembl: AnnotationMap,
    hgnc: AnnotationMap,
    gencode: AnnotationMap,
}

impl GeneResolver {
    pub fn new(ensembl: AnnotationMap, hgnc: AnnotationMap, gencode: AnnotationMap) -> Self {
        Self {
            ensembl,
            hgnc,
            gencode,
        }
    }

    pub fn resolve(&self, gene_id: &str) -> Option<Resolution<'_>> {
        if let Some(name) = self.ensembl.get(gene_id) {
            return Some(Resolution {
                name,
                source: AnnotationSource::Ensembl,
            });
        }
        if let Some(name) = self.hgnc.get(gene_id) {
            return Some(Resolution {
                name,
                source: AnnotationSource::Hgnc,
            });
        }
        if let Some(name) = self.gencode.get(gene_id) {
            return Some(Resolution {
                name,
                source: AnnotationSource::Gencode,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::annotation::AnnotationMap;

    use super::*;

    fn map(entries: &[(&str, &str)]) -> AnnotationMap {
        entries
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn ensembl_wins_over_other_sources() {
        let resolver = GeneResolver::new(
            map(&[("ENSG001", "FOO")]),
            map(&[("ENSG001", "HGNC_FOO")]),
            map(&[("ENSG001", "GENCODE_FOO")]),
        );

        let hit = resolver.resolve("ENSG001").unwrap();
        assert_eq!(hit.name, "FOO");
        assert_eq!(hit.source, AnnotationSource::Ensembl);
    }

    #[test]
    fn hgnc_wins_over_gencode() {
        let resolver = GeneResolver::new(
            map(&[]),
            map(&[("ENSG002", "HGNC_BAR")]),
            map(&[("ENSG002", "GENCODE_BAR")]),
        );

        let hit = resolver.resolve("ENSG002").unwrap();
        assert_eq!(hit.name, "HGNC_BAR");
        assert_eq!(hit.source, AnnotationSource::Hgnc);
    }

    #[test]
    fn gencode_is_last_resort() {
        let resolver = GeneResolver::new(map(&[]), map(&[]), map(&[("ENSG003", "BAZ")]));

        let hit = resolver.resolve("ENSG003").unwrap();
        assert_eq!(hit.name, "BAZ");
        assert_eq!(hit.source, AnnotationSource::Gencode);
    }

    #[test]
    fn absent_everywhere_is_unresolved() {
        let resolver = GeneResolver::new(map(&[("ENSG001", "FOO")]), map(&[]), map(&[]));
        assert_eq!(resolver.resolve("ENSG999"), None);
    }
}
