// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SPARQL templates used by the repositories

use crate::graph::parameterized::render_uri;

pub const TOTAL_NUMBER_OF_RESOURCES: &str = r#"SELECT (COUNT(DISTINCT ?resource) AS ?resourceSum)
@fromResources
WHERE {
    VALUES ?type { @resourceTypes }
    ?resource rdf:type ?type .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
    ?resource @hasPidUri ?pidUri .
}"#;

pub const TOTAL_NUMBER_OF_RESOURCES_BY_PREDICATE: &str = r#"SELECT ?predicate (COUNT(DISTINCT ?resource) AS ?valueSum)
@fromResources
@fromConsumerGroups
@fromMetadata
@fromShacl
@fromEnterpriseCore
WHERE {
    @predicate rdfs:domain ?class .
    BIND(@predicate AS ?predicate)
    ?resource rdf:type [ rdfs:subClassOf* ?class ] .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
    ?resource @hasPidUri ?pidUri .
}
GROUP BY ?predicate"#;

pub const CONTROLLED_VOCABULARY_SELECTION: &str = r#"SELECT ?predicate ?predicateName ?label ?o (COUNT(DISTINCT ?resource) AS ?valueSum)
@fromResources
@fromConsumerGroups
@fromMetadata
@fromShacl
WHERE {
    VALUES ?type { @resourceTypes }
    ?resource rdf:type ?type .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
    ?resource @hasPidUri ?pidUri .
    ?resource @predicate ?o .
    ?resource ?predicate ?o .
    ?o rdfs:label ?label .
    ?shacl sh:path ?predicate .
    ?shacl sh:name ?predicateName .
}
GROUP BY ?o ?label ?predicateName ?predicate"#;

pub const PROPERTY_VALUES_OF_ALL_RESOURCES: &str = r#"SELECT DISTINCT ?resource ?string ?predicateName
@fromResources
@fromMetadata
@fromShacl
WHERE {
    VALUES ?type { @resourceTypes }
    ?resource rdf:type ?type .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
    ?resource @hasPidUri ?pidUri .
    OPTIONAL {
        ?resource @predicate ?string .
        ?shacl sh:path @predicate .
        ?shacl sh:name ?predicateName .
    }
    FILTER(!BOUND(?predicateName) || lang(?predicateName) IN (@language, ""))
}
ORDER BY strlen(str(?string))"#;

pub const NUMBER_OF_VERSIONS_OF_RESOURCES: &str = r#"SELECT (COUNT(DISTINCT ?laterVersion) AS ?laterVersions)
@fromResources
WHERE {
    VALUES ?type { @resourceTypes }
    ?resource rdf:type ?type .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
    ?resource @hasPidUri ?pidUri .
    ?resource @hasLaterVersion+ ?laterVersion .
    FILTER NOT EXISTS { ?previousVersion @hasLaterVersion ?resource }
}
GROUP BY ?resource
ORDER BY ?laterVersions"#;

pub const PROPERTY_USAGE_BY_GROUP: &str = r#"SELECT ?links (COUNT(?resource) AS ?resources)
@fromResources
@fromMetadata
@fromShacl
WHERE {
    SELECT ?resource (COUNT(?link) AS ?links)
    WHERE {
        {
            ?resource rdf:type [ rdfs:subClassOf+ @firstResourceType ] .
            FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
            ?resource @hasPidUri ?pidUri .
            ?resource ?predicate ?link .
            ?shacl sh:path ?predicate .
            ?shacl sh:group @group .
        }
        UNION
        {
            ?resource rdf:type [ rdfs:subClassOf+ @firstResourceType ] .
            FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
            ?resource @hasPidUri ?pidUri .
            ?resource ?predicate ?nonlink .
            FILTER NOT EXISTS {
                ?shacl sh:path ?predicate .
                ?shacl sh:group @group .
            }
        }
    }
    GROUP BY ?resource
}
GROUP BY ?links
ORDER BY ?links"#;

/// Counts per dimension value and lifecycle status
///
/// `@dimension` is a graph pattern that binds `?key` for a `?resource`.
pub const CHARACTERISTICS: &str = r#"SELECT ?key ?label ?status (COUNT(DISTINCT ?resource) AS ?count)
@from
WHERE {
    VALUES ?type { @resourceTypes }
    ?resource rdf:type ?type .
    ?resource @hasPidUri ?pidUri .
    ?resource @hasLifecycleStatus ?status .
    @dimension
    OPTIONAL {
        ?key rdfs:label ?label .
        FILTER(lang(?label) IN (@language, ""))
    }
}
GROUP BY ?key ?label ?status
ORDER BY ?key"#;

pub const DIMENSION_RESOURCE_TYPE: &str = "BIND(?type AS ?key)";
pub const DIMENSION_LIFECYCLE_STATUS: &str = "BIND(?status AS ?key)";

/// Dimension pattern keyed by the object of `predicate`
///
/// Plain literals are inserted verbatim, so the URI is rendered here.
pub fn dimension_by_predicate(predicate: &str) -> String {
    format!("?resource {} ?key .", render_uri(predicate))
}

pub const ALL_PROPERTIES_BY_RESOURCE_TYPES: &str = r#"SELECT DISTINCT ?type ?shacl ?predicate ?predicateName ?group ?minCount
@fromShacl
WHERE {
    VALUES ?type { @resourceTypes }
    ?type sh:property ?shacl .
    ?shacl sh:path ?predicate .
    OPTIONAL {
        ?shacl sh:name ?predicateName .
        FILTER(lang(?predicateName) IN (@language, ""))
    }
    OPTIONAL { ?shacl sh:group ?group . }
    OPTIONAL { ?shacl sh:minCount ?minCount . }
}
ORDER BY ?type ?predicate"#;

pub const USAGE_OF_PROPERTIES: &str = r#"SELECT ?predicate (COUNT(DISTINCT ?resource) AS ?usage)
@fromResources
WHERE {
    VALUES ?predicate { @properties }
    ?resource ?predicate ?value .
    ?resource @hasPidUri ?pidUri .
    FILTER NOT EXISTS { ?resource @hasPidEntryDraft ?draftResource . }
}
GROUP BY ?predicate"#;

pub const CONTACTS: &str = r#"SELECT DISTINCT ?contact
@fromResources
@fromEnterpriseCore
@fromMetadata
WHERE {
    ?range rdfs:subClassOf* @person .
    ?predicate rdfs:range ?range .
    ?subject ?predicate ?contact .
}
ORDER BY ?contact"#;

pub const CONTACT_REFERENCED_ENTRIES: &str = r#"SELECT DISTINCT ?subject ?pidUri ?label ?consumerGroup ?predicate ?predicateLabel ?shaclGroup ?contact
@fromResources
@fromEnterpriseCore
@fromMetadata
@fromShacl
WHERE {
    VALUES ?contactType { @contactTypes }
    ?predicate rdfs:range ?contactType .
    ?shacl sh:path ?predicate .
    OPTIONAL { ?shacl sh:group ?shaclGroup }
    ?shacl sh:name ?predicateLabel .
    {
        SELECT ?subject
        WHERE {
            VALUES ?type { @resourceTypes }
            ?subject a ?type .
            {
                ?subject ?predicate @userEmailAddress .
            }
            UNION
            {
                ?subject @distribution | @mainDistribution ?endpoint .
                ?endpoint ?predicate @userEmailAddress .
            }
        }
    }
    {
        ?subject ?predicate ?contact .
    }
    UNION
    {
        ?subject @distribution | @mainDistribution ?endpoint .
        ?endpoint ?predicate ?contact .
    }
    ?subject @hasPid ?pidUri .
    ?subject @hasLabel ?label .
    ?subject @hasConsumerGroup ?consumerGroup .
    FILTER NOT EXISTS { ?subject @hasPidEntryDraft ?draftResource }
}
ORDER BY ?subject"#;
