//! # Version Chains Across Nodes
//!
//! One node anchors the first version; a collaborator who received it
//! prepares, anchors and distributes the next one.

#[cfg(test)]
mod tests {
    use crate::integration::loopback::{Network, TYPE_URL};
    use cd_02_core_document::validators::version::{
        DOCUMENT_IDENTIFIER_KEY, PREVIOUS_ROOT_KEY,
    };
    use cd_02_core_document::validators::UpdateVersionValidator;
    use cd_02_core_document::{DocumentProcessor, GenericModel, Model, Validator};

    #[tokio::test]
    async fn test_collaborator_continues_the_chain() {
        let network = Network::new();
        let (a, b, c) = (network.join(), network.join(), network.join());

        let mut v1 = a.invoice(&[&a, &b], "1000");
        a.anchor(&mut v1).await.unwrap();
        a.processor.send_document(&a.ctx, &v1).await.unwrap();
        let v1_at_b = b.received().remove(0);

        // b adds c and raises the amount
        let next = v1_at_b
            .core_document()
            .unwrap()
            .prepare_new_version(&[c.id.to_hex()])
            .unwrap();
        let mut v2 = GenericModel::new(TYPE_URL, v1_at_b.attributes().clone(), next);
        v2.set_attribute("invoice.amount", b"1200".to_vec());
        v2.calculate_data_root().unwrap();
        b.anchor(&mut v2).await.unwrap();
        b.processor.send_document(&b.ctx, &v2).await.unwrap();

        let v2_at_a = a.received().remove(0);
        assert_eq!(v2_at_a.attributes()["invoice.amount"], b"1200".to_vec());
        assert!(UpdateVersionValidator
            .validate(Some(&v1), Some(&v2_at_a))
            .await
            .is_ok());

        let v2_at_c = c.received().remove(0);
        assert_eq!(v2_at_c, v2_at_a);
        let cd = v2_at_c.pack_core_document().unwrap();
        assert!(cd.peer_can_read(&c.id).is_ok());
        assert_eq!(cd.signatures().len(), 3);
        assert_eq!(network.ledger.anchored_count(), 2);
    }

    #[tokio::test]
    async fn test_unrelated_document_is_not_a_next_version() {
        let network = Network::new();
        let (a, b) = (network.join(), network.join());

        let mut first = a.invoice(&[&a, &b], "1");
        a.anchor(&mut first).await.unwrap();
        let mut other = a.invoice(&[&a, &b], "2");
        a.anchor(&mut other).await.unwrap();

        let errors = UpdateVersionValidator
            .validate(Some(&first), Some(&other))
            .await
            .unwrap_err();

        assert!(errors.contains_key(DOCUMENT_IDENTIFIER_KEY));
        assert!(errors.contains_key(PREVIOUS_ROOT_KEY));
    }
}
