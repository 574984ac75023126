mod common;

#[cfg(test)]
mod tests {
    use bitsearch::analysis::FieldType;
    use bitsearch::bitset::DocId;
    use bitsearch::query::{Query, QueryBuilder};
    use bitsearch::search::{HighlightValue, SearchResult};

    use crate::common::{book_schema, books, index_books, init_logger, memory_store};

    fn sorted_ids(result: &SearchResult) -> Vec<DocId> {
        let mut ids = result.ids();
        ids.sort_unstable();
        ids
    }

    fn book_query() -> Query {
        QueryBuilder::new()
            .boost(0.5)
            .paging(0, 100)
            .facets(["genre_s", "sequence_i"])
            .highlight_tags("<u>", "</u>")
            .highlight(["name", "author", "cat", "series_t"])
            .suggest("hel", ["description"])
            .and()
            .term("sequence_i", 1)
            .or()
            .term("cat", "book")
            .term("cat", "hardcover")
            .end()
            .not()
            .or()
            .term("inStock", false)
            .end()
            .end()
            .or()
            .term("name", "lightning")
            .term("name", "lucene")
            .term("author", "rick")
            .term("series_t", "jaqkon")
            .end()
            .end()
            .build()
    }

    #[tokio::test]
    async fn test_book_query_matches_in_stock_first_volumes() {
        init_logger();
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;

        let result = searcher.search(&book_query()).await;
        assert!(result.is_complete(), "{:?}", result.errors);
        assert_eq!(result.total, 2);
        // Lucene in Action: sequence_i + cat book + name lucene = 1.1 * 0.5
        // The Lightning Thief: 1.8 * 0.5
        assert_eq!(result.ids(), vec![2, 3]);
        assert!((result.documents[0].boost - 0.55).abs() < 1e-9);
        assert!((result.documents[1].boost - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_book_query_highlights_facets_and_suggests() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;
        let result = searcher.search(&book_query()).await;

        let thief = &result.documents[1];
        assert_eq!(thief.id, 3);
        assert_eq!(
            thief.get_highlight("name"),
            Some(&HighlightValue::Text("The <u>Lightning</u> Thief".to_string()))
        );
        assert_eq!(
            thief.get_highlight("author").unwrap().texts(),
            vec!["<u>Rick</u> Riordan"]
        );
        assert_eq!(
            thief.get_highlight("cat").unwrap().texts(),
            vec!["<u>book</u>,hardcover", "book,<u>hardcover</u>"]
        );
        assert_eq!(
            thief.get_highlight("series_t").unwrap().texts(),
            vec!["Percy <u>Jackson</u> and the Olympians"]
        );

        let lucene = &result.documents[0];
        assert_eq!(
            lucene.get_highlight("name").unwrap().texts(),
            vec!["<u>Lucene</u> in Action, Second Edition"]
        );
        assert!(lucene.get_highlight("author").is_none());

        // genre_s was detected as TEXT, where "IT" is a stop word.
        assert_eq!(result.facets["genre_s"].get("fantasy"), Some(&1));
        assert_eq!(result.facets["genre_s"].len(), 1);
        assert_eq!(result.facets["sequence_i"].get("1"), Some(&2));
        assert!(!result.facets["sequence_i"].contains_key("2"));

        assert_eq!(result.suggests["description"], vec!["Hello all", "Hello world"]);
    }

    #[tokio::test]
    async fn test_json_query_gives_same_result() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;
        let query = Query::from_json_str(&book_query().to_string()).unwrap();
        assert_eq!(query, book_query());
        assert_eq!(searcher.search(&query).await.ids(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_every_literal_field_value_finds_its_document() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;

        for (id, book) in books().iter().enumerate() {
            for (field, value) in book {
                let query = QueryBuilder::new().term(field.clone(), value.clone()).paging(0, 10).build();
                let result = searcher.search(&query).await;
                assert!(
                    result.ids().contains(&(id as DocId)),
                    "{field}={value} did not find book {id}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_stop_word_leaf_is_ignored() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;

        let with_stop_word = QueryBuilder::new()
            .and()
            .term("cat", "hardcover")
            .term("name", "the")
            .build();
        let without = QueryBuilder::new().and().term("cat", "hardcover").build();
        assert_eq!(searcher.search(&with_stop_word).await.ids(), vec![3]);
        assert_eq!(
            searcher.search(&with_stop_word).await.ids(),
            searcher.search(&without).await.ids()
        );

        let only_stop_word = QueryBuilder::new().term("name", "the").build();
        assert_eq!(sorted_ids(&searcher.search(&only_stop_word).await), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_not_all_is_empty() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;
        let query = QueryBuilder::new().not().and().end().build();
        let result = searcher.search(&query).await;
        assert_eq!(result.total, 0);
        assert!(result.documents.is_empty());
    }

    #[tokio::test]
    async fn test_soundex_matches_misspelling() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;
        let query = QueryBuilder::new().term("series_t", "Persi Jaxon").build();
        assert_eq!(sorted_ids(&searcher.search(&query).await), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_suggestions_are_original_values_once_each() {
        let (_, searcher) = index_books(memory_store().await, book_schema()).await;
        let result = searcher
            .search(&Query::all().with_suggest("hel", ["description"]))
            .await;
        assert_eq!(
            result.suggests["description"],
            vec!["Hello moon", "Hello mars", "Hello all", "Hello world"]
        );

        let result = searcher
            .search(&Query::all().with_suggest("hello w", ["description"]))
            .await;
        assert_eq!(result.suggests["description"], vec!["Hello world"]);
    }

    #[tokio::test]
    async fn test_keyword_facets_over_whole_corpus() {
        let mut schema = book_schema();
        schema.add_field("genre_s").set_type(FieldType::Keyword);
        let (_, searcher) = index_books(memory_store().await, schema).await;

        let result = searcher.search(&Query::all().with_facets(["genre_s"])).await;
        let genres = &result.facets["genre_s"];
        assert_eq!(genres.get("fantasy"), Some(&3));
        assert_eq!(genres.get("IT"), Some(&1));
        assert_eq!(genres.len(), 2);
    }
}
