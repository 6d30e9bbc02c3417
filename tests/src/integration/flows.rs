//! # Cross-Node Flows
//!
//! ```text
//! [Node A] ──sign request──→ [Node B, Node C]
//!     │  ←──signatures──────────┘
//!     ↓
//! [Ledger] ←──commit(document root, MAC)
//!     │
//!     ↓
//! [Node A] ──anchored document──→ [Node B, Node C]
//!                                  post anchored check against the ledger
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::loopback::{Network, TYPE_URL};
    use cd_02_core_document::validators::anchored::ANCHOR_KEY;
    use cd_02_core_document::validators::roots::DOCUMENT_ROOT_KEY;
    use cd_02_core_document::{
        AnchorError, AnchorId, DocumentProcessor, DocumentRoot, InMemoryAnchorRepository, Model,
        ProcessorError,
    };
    use std::time::Duration;

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_three_nodes_sign_anchor_and_distribute() {
        doc_telemetry::init_test_tracing();
        let network = Network::new();
        let (a, b, c) = (network.join(), network.join(), network.join());

        let mut invoice = a.invoice(&[&a, &b, &c], "1500");
        a.anchor(&mut invoice).await.unwrap();
        a.processor.send_document(&a.ctx, &invoice).await.unwrap();

        let sent = invoice.pack_core_document().unwrap();
        assert_eq!(sent.signatures().len(), 3);
        for node in [&b, &c] {
            let received = node.received();
            assert_eq!(received.len(), 1);
            assert_eq!(received[0].type_url(), TYPE_URL);
            assert_eq!(received[0].attributes(), invoice.attributes());
            assert_eq!(received[0].pack_core_document().unwrap(), sent);
        }
        assert!(a.received().is_empty());

        let record = network
            .ledger
            .anchor_record(&AnchorId::for_document(&sent).unwrap())
            .unwrap();
        assert_eq!(record.caller, a.id);
        assert_eq!(record.document_root, DocumentRoot::for_document(&sent).unwrap());
    }

    #[tokio::test]
    async fn test_every_signer_is_a_collaborator() {
        let network = Network::new();
        let (a, b) = (network.join(), network.join());
        let bystander = network.join();

        let mut invoice = a.invoice(&[&a, &b], "10");
        a.anchor(&mut invoice).await.unwrap();
        a.processor.send_document(&a.ctx, &invoice).await.unwrap();

        let cd = invoice.pack_core_document().unwrap();
        let signers: Vec<_> = cd.signatures().iter().map(|s| s.signer_id).collect();
        assert_eq!(signers, vec![a.id, b.id]);
        assert!(bystander.received().is_empty());
        assert!(cd.peer_can_read(&bystander.id).is_err());
    }

    // =========================================================================
    // FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_offline_signer_fails_collection_and_keeps_model() {
        let network = Network::new();
        let (a, b, c) = (network.join(), network.join(), network.join());
        c.set_online(false);

        let mut invoice = a.invoice(&[&a, &b, &c], "99");
        a.processor
            .prepare_for_signature_requests(&a.ctx, &mut invoice)
            .await
            .unwrap();
        let self_signed = invoice.clone();

        let err = a
            .processor
            .request_signatures(&a.ctx, &mut invoice)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessorError::SignatureCollection(_)));
        assert_eq!(invoice, self_signed);
        assert_eq!(invoice.pack_core_document().unwrap().signatures().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_distribution_reports_offline_recipient() {
        let network = Network::new();
        let (a, b, c) = (network.join(), network.join(), network.join());

        let mut invoice = a.invoice(&[&a, &b, &c], "250");
        a.anchor(&mut invoice).await.unwrap();
        c.set_online(false);

        let err = a
            .processor
            .send_document(&a.ctx, &invoice)
            .await
            .unwrap_err();

        match err {
            ProcessorError::PartialSend { total, failures } => {
                assert_eq!(total, 2);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].recipient, c.id);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(b.received().len(), 1);
        assert!(c.received().is_empty());
    }

    #[tokio::test]
    async fn test_receiver_refuses_unanchored_document() {
        let network = Network::new();
        let (a, b) = (network.join(), network.join());

        let mut invoice = a.invoice(&[&a, &b], "75");
        a.processor
            .prepare_for_signature_requests(&a.ctx, &mut invoice)
            .await
            .unwrap();
        a.processor
            .request_signatures(&a.ctx, &mut invoice)
            .await
            .unwrap();
        a.processor
            .prepare_for_anchoring(&a.ctx, &mut invoice)
            .await
            .unwrap();

        // skip the ledger and deliver directly
        let cd = invoice.pack_core_document().unwrap();
        let err = a.processor.send(&a.ctx, &cd, b.id).await.unwrap_err();

        assert!(matches!(err, ProcessorError::NotAccepted { recipient } if recipient == b.id));
        let rejected = b.rejected();
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].messages_for(ANCHOR_KEY)[0]
            .starts_with("failed to get document root from chain"));
        assert!(b.received().is_empty());
    }

    #[tokio::test]
    async fn test_receiver_refuses_tampered_signatures() {
        let network = Network::new();
        let (a, b) = (network.join(), network.join());

        let mut invoice = a.invoice(&[&a, &b], "500");
        a.anchor(&mut invoice).await.unwrap();

        let mut cd = invoice.pack_core_document().unwrap();
        cd.signature_data.signatures.pop();
        let err = a.processor.send(&a.ctx, &cd, b.id).await.unwrap_err();

        assert!(matches!(err, ProcessorError::NotAccepted { .. }));
        let rejected = b.rejected();
        assert_eq!(rejected[0].messages_for(DOCUMENT_ROOT_KEY), vec!["document root mismatch"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfirmed_anchor_times_out_at_deadline() {
        let network = Network::with_ledger(InMemoryAnchorRepository::new().never_confirming());
        let (a, b) = (network.join(), network.join());

        let mut invoice = a.invoice(&[&a, &b], "42");
        let ctx = a.ctx.clone().with_timeout(Duration::from_secs(5));
        a.processor
            .prepare_for_signature_requests(&ctx, &mut invoice)
            .await
            .unwrap();
        a.processor
            .request_signatures(&ctx, &mut invoice)
            .await
            .unwrap();
        a.processor
            .prepare_for_anchoring(&ctx, &mut invoice)
            .await
            .unwrap();

        let err = a
            .processor
            .anchor_document(&ctx, &invoice)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessorError::AnchorConfirmation(AnchorError::ConfirmationTimeout)
        ));
        let err = a
            .processor
            .send_document(&ctx, &invoice)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessorError::PostAnchorValidation(_)));
    }
}
